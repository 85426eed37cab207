// wallrunner: a 2D platformer locomotion controller
//
// - `core`: small math helpers
// - `engine`: fixed-step loop, intent events, rapier2d physics world
// - `game`: locomotion state machine, presentation adapter, character entity

pub mod core;
pub mod engine;
pub mod game;
