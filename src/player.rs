use bevy::prelude::*;

/// Marker the host game attaches to its player entity. Homing attacks and
/// fire-pattern aiming read the transform behind it; nothing here mutates it.
#[derive(Component, Reflect, Default, Debug)]
#[reflect(Component)]
pub struct Player;
