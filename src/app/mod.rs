// Application layer - Use case interactors

pub mod batch_interactor;
pub mod container;
pub mod inspect_interactor;

// Re-export interactors
pub use batch_interactor::{BatchInteractor, BatchReport, FileResult, FileStatus};
pub use container::{AppContainer, DefaultAppContainer};
pub use inspect_interactor::{InspectFormat, InspectInteractor, InspectRequest, InspectResponse};
