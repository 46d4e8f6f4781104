use std::sync::Arc;

use crate::adapters::{FFmpegAdapter, FFprobeAdapter, LocalFsAdapter};
use crate::app::{batch_interactor::BatchInteractor, inspect_interactor::InspectInteractor};
use crate::ports::{ExecutePort, FsPort, ProbePort};

pub trait AppContainer: Send + Sync {
    fn batch_interactor(&self) -> Arc<BatchInteractor>;
    fn inspect_interactor(&self) -> Arc<InspectInteractor>;
}

pub struct DefaultAppContainer {
    batch_interactor: Arc<BatchInteractor>,
    inspect_interactor: Arc<InspectInteractor>,
}

impl DefaultAppContainer {
    /// Wire the ffprobe/ffmpeg/local-disk adapters
    pub fn new() -> Self {
        Self::with_ports(
            Arc::new(FFprobeAdapter::new()),
            Arc::new(FFmpegAdapter::new()),
            Arc::new(LocalFsAdapter::new()),
        )
    }

    pub fn with_ports(
        probe_port: Arc<dyn ProbePort>,
        execute_port: Arc<dyn ExecutePort>,
        fs_port: Arc<dyn FsPort>,
    ) -> Self {
        let batch_interactor = Arc::new(BatchInteractor::new(
            Arc::clone(&probe_port),
            Arc::clone(&execute_port),
            Arc::clone(&fs_port),
        ));

        let inspect_interactor = Arc::new(InspectInteractor::new(
            Arc::clone(&probe_port),
            Arc::clone(&execute_port),
            Arc::clone(&fs_port),
        ));

        Self {
            batch_interactor,
            inspect_interactor,
        }
    }
}

impl Default for DefaultAppContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContainer for DefaultAppContainer {
    fn batch_interactor(&self) -> Arc<BatchInteractor> {
        Arc::clone(&self.batch_interactor)
    }

    fn inspect_interactor(&self) -> Arc<InspectInteractor> {
        Arc::clone(&self.inspect_interactor)
    }
}
