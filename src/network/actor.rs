//! Network actor - runs record API calls in Tokio async runtime

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::error::ApiError;
use crate::messages::{ApiCommand, ApiResponse};
use crate::network::client::RemoteClient;

/// Network actor that turns `ApiCommand`s into remote calls
pub struct NetworkActor {
    client: RemoteClient,
    response_tx: mpsc::UnboundedSender<ApiResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(client: RemoteClient, response_tx: mpsc::UnboundedSender<ApiResponse>) -> Self {
        NetworkActor {
            client,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<ApiCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(ApiCommand::Shutdown) | None => {
                            // In-flight calls are dropped, nobody is listening
                            self.active_requests.abort_all();
                            break;
                        }
                        Some(command) => {
                            let client = self.client.clone();
                            let response_tx = self.response_tx.clone();
                            self.active_requests.spawn(async move {
                                if let Some(response) = execute(&client, command).await {
                                    let _ = response_tx.send(response);
                                }
                            });
                        }
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }
}

/// Execute one command and describe the outcome; `None` for `Shutdown`
pub async fn execute(client: &RemoteClient, command: ApiCommand) -> Option<ApiResponse> {
    tracing::info!(op = ?command.operation(), "Executing request");

    let (id, result) = match command {
        ApiCommand::List { id } => (
            id,
            client.list().await.map(|records| ApiResponse::Listed { id, records }),
        ),
        ApiCommand::Create { id, fields } => (
            id,
            client.create(&fields).await.map(|record| ApiResponse::Saved { id, record }),
        ),
        ApiCommand::Update { id, record_id, fields } => (
            id,
            client
                .update(record_id, &fields)
                .await
                .map(|record| ApiResponse::Saved { id, record }),
        ),
        ApiCommand::Delete { id, record_id } => (
            id,
            client
                .delete(record_id)
                .await
                .map(|()| ApiResponse::Deleted { id, record_id }),
        ),
        ApiCommand::Shutdown => return None,
    };

    Some(result.unwrap_or_else(|err| failure(client, id, err)))
}

fn failure(client: &RemoteClient, id: u64, err: ApiError) -> ApiResponse {
    tracing::warn!(id, error = %err, "Request failed");
    ApiResponse::Failed {
        id,
        operation: err.operation(),
        message: err.user_message(client.dialect().noun()),
        status: err.status(),
    }
}
