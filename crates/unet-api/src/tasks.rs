// Dispatch task endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{CreateTaskRequest, Task};

impl ApiClient {
    /// `GET /api/tasks`
    pub async fn list_tasks(&self) -> Result<Vec<Task>, Error> {
        debug!("listing tasks");
        self.get_json("tasks", &[]).await
    }

    /// Queue a new feeding task.
    ///
    /// `POST /api/tasks`; the server answers 201 with the stored task.
    pub async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, Error> {
        debug!(
            material = %request.material_code,
            target = %request.target_device,
            quantity = request.quantity,
            "creating task"
        );
        self.post_json("tasks", request).await
    }
}
