// Input handling
//
// Device mapping lives outside this crate; what arrives here are intent
// events ("move at 0.7", "dash pressed").
//
// - `action`: intent and phase definitions
// - `script`: timeline of intents keyed by fixed-step index
//
// ```rust
// use wallrunner::engine::input::{InputScript, Intent, IntentEvent};
//
// let mut script = InputScript::new()
//     .at(0, IntentEvent::move_axis(1.0))
//     .at(30, IntentEvent::pressed(Intent::Jump));
//
// for event in script.drain_due(0) {
//     // deliver to the character before running step 0
// }
// ```

pub mod action;
pub mod script;

pub use action::{InputPhase, Intent, IntentEvent};
pub use script::{InputScript, ScriptedIntent};
