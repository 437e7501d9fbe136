//! Phone confirmation of bookings and orders
//!
//! - [`flow`] - pure state machine (`collecting → pending_confirmation → …`)
//! - [`code`] - code generation
//! - [`timer`] - per-draft countdown task
//! - [`events`] - view-model events for the rendering layer

pub mod code;
pub mod error;
pub mod events;
pub mod flow;
pub mod timer;

pub use code::{CodeSource, RandomCodeSource, ScriptedCodes};
pub use error::{FlowError, FlowResult};
pub use events::FlowEvent;
pub use flow::{ConfirmationFlow, Dispatch, DispatchKind, FlowPhase, FlowSettings, RestoreOutcome};
pub use timer::CountdownTimer;
