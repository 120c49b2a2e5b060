use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::computer::interface::ComputerInterface;
use crate::errors::DeskPilotResult;

/// One live connection to the desktop-control backend. Established exactly
/// once via [`Session::establish`]; `disconnect` is idempotent so the
/// release happens exactly once no matter how many shutdown paths run.
pub struct Session {
    backend: Arc<dyn ComputerInterface>,
    released: AtomicBool,
}

impl Session {
    pub async fn establish(backend: Arc<dyn ComputerInterface>) -> DeskPilotResult<Self> {
        backend.connect().await?;
        Ok(Self {
            backend,
            released: AtomicBool::new(false),
        })
    }

    pub fn interface(&self) -> Arc<dyn ComputerInterface> {
        Arc::clone(&self.backend)
    }

    pub async fn disconnect(&self) -> DeskPilotResult<()> {
        if self.released.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.backend.disconnect().await
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.released.load(Ordering::SeqCst) {
            tracing::warn!("session dropped without an explicit disconnect");
        }
    }
}

/// Runs `body` against a freshly established session and releases the
/// connection on both the success and the error path.
pub async fn with_session<T, F, Fut>(
    backend: Arc<dyn ComputerInterface>,
    body: F,
) -> DeskPilotResult<T>
where
    F: FnOnce(Arc<dyn ComputerInterface>) -> Fut,
    Fut: Future<Output = DeskPilotResult<T>>,
{
    let session = Session::establish(backend).await?;
    let result = body(session.interface()).await;
    if let Err(e) = session.disconnect().await {
        tracing::warn!(error = %e, "error while releasing session");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::computer::mock::RecordingComputer;
    use crate::errors::DeskPilotError;

    #[tokio::test]
    async fn session_released_once_when_body_errors() {
        let backend = Arc::new(RecordingComputer::new());
        let result: DeskPilotResult<()> = with_session(backend.clone(), |iface| async move {
            iface.left_click(1, 2).await?;
            Err(DeskPilotError::Agent("boom".into()))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(backend.connects(), 1);
        assert_eq!(backend.disconnects(), 1);
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let backend = Arc::new(RecordingComputer::new());
        let session = Session::establish(backend.clone()).await.unwrap();
        session.disconnect().await.unwrap();
        session.disconnect().await.unwrap();
        assert_eq!(backend.disconnects(), 1);
    }

    #[tokio::test]
    async fn failed_connect_propagates() {
        let backend = Arc::new(RecordingComputer::new());
        backend.fail_connect();
        assert!(Session::establish(backend.clone()).await.is_err());
        assert_eq!(backend.disconnects(), 0);
    }
}
