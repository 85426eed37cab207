// Engine modules: fixed-step loop, intent input, physics

pub mod game_loop;
pub mod input;
pub mod physics;
