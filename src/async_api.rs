use crate::aggregator::CategorySample;
use crate::dashboard::Dashboard;
use crate::export::ExportedDocument;
use crate::{Error, Result, Surface};
use std::sync::mpsc::{self, Sender};
use std::thread;
use tokio::sync::oneshot;

enum Command {
    Notify(CategorySample, oneshot::Sender<Result<bool>>),
    IsComplete(oneshot::Sender<bool>),
    ChartRenders(oneshot::Sender<usize>),
    Export(oneshot::Sender<Result<ExportedDocument>>),
    Close(oneshot::Sender<()>),
}

/// An async-friendly dashboard handle backed by a dedicated worker thread.
///
/// The worker thread owns the `Dashboard` and executes commands one at a
/// time, so an export can never start while another one is running and
/// samples arriving during an export wait until it finishes.
#[derive(Clone)]
pub struct DashboardHandle {
    cmd_tx: Sender<Command>,
}

impl DashboardHandle {
    /// Move `dashboard` onto a new worker thread.
    pub fn spawn<S>(mut dashboard: Dashboard<S>) -> Self
    where
        S: Surface + Send + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();

        thread::spawn(move || {
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Notify(sample, resp) => {
                        let res = dashboard.notify(sample);
                        let _ = resp.send(res);
                    }
                    Command::IsComplete(resp) => {
                        let _ = resp.send(dashboard.is_complete());
                    }
                    Command::ChartRenders(resp) => {
                        let _ = resp.send(dashboard.chart_renders());
                    }
                    Command::Export(resp) => {
                        let res = dashboard.export();
                        let _ = resp.send(res);
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(());
                        break;
                    }
                }
            }
            log::debug!("dashboard worker stopped");
        });

        Self { cmd_tx }
    }

    fn send(&self, cmd: Command) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| Error::Other("Dashboard worker has stopped".into()))
    }

    /// Feed one category sample; resolves to true if it triggered chart rendering.
    pub async fn notify(&self, sample: CategorySample) -> Result<bool> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Notify(sample, tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("Notify canceled: {}", e)))?
    }

    pub async fn is_complete(&self) -> Result<bool> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::IsComplete(tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("IsComplete canceled: {}", e)))
    }

    pub async fn chart_renders(&self) -> Result<usize> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::ChartRenders(tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("ChartRenders canceled: {}", e)))
    }

    /// Export the dashboard; runs on the worker thread.
    pub async fn export(&self) -> Result<ExportedDocument> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Export(tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("Export canceled: {}", e)))?
    }

    /// Stop the worker. Other clones of this handle fail afterwards.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Close(tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("Close canceled: {}", e)))
    }
}
