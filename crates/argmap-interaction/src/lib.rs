pub mod clone_map;
pub mod coordinator;
pub mod error;
pub mod frame;
pub mod handlers;
pub mod input;
pub mod memory_store;
pub mod session;
pub mod settings;
pub mod store;

pub use clone_map::{AltCloneMap, CloneEntry};
pub use coordinator::{ClickContext, ClickOutcome, DragCoordinator, DragStart, MoveOutcome};
pub use error::{InteractionError, StoreError};
pub use frame::{FrameHandle, FrameQueue};
pub use handlers::InteractionHandlers;
pub use input::{Modifiers, NodeRef, PointerButton, PointerEvent};
pub use memory_store::{GraphDocument, MemoryGraphStore, SharedGraph};
pub use session::{DragPhase, DragSession, GestureEvent, Participant, PendingMove};
pub use settings::{InteractionSettings, SettingsError, SnapSettings};
pub use store::GraphStore;
