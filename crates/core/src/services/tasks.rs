use crate::api::ApiClient;
use crate::error::ApiResult;
use crate::model::{Task, TaskDraft, TaskFilters, TaskPatch};

/// Handle for one in-flight load; only the most recently issued ticket may
/// commit its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Client-visible task collection for the selected period, kept consistent
/// with store responses instead of reloading after every mutation.
///
/// Entries keep server insertion order; identity is the server-assigned id.
/// Loads are sequence-tagged so a slow response to an old request can never
/// overwrite the result of a newer one. Every mutating call goes to the
/// store first and touches the collection only on success, so a failure
/// leaves the board at its last applied state.
#[derive(Debug, Default)]
pub struct TaskBoard {
    tasks: Vec<Task>,
    issued: u64,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.get(id).is_some()
    }

    /// Start a load and reserve its place in the sequence.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket(self.issued)
    }

    /// Commit a load response. Returns whether it was applied; a response
    /// holding anything but the newest ticket is dropped as stale.
    pub fn finish_load(&mut self, ticket: LoadTicket, tasks: Vec<Task>) -> bool {
        if ticket.0 != self.issued {
            tracing::debug!(
                ticket = ticket.0,
                newest = self.issued,
                "dropping stale load response"
            );
            return false;
        }
        self.tasks = tasks;
        true
    }

    /// Replace the whole collection from the store. Used on period change
    /// and explicit refresh.
    pub async fn load(&mut self, api: &ApiClient, filters: &TaskFilters) -> ApiResult<bool> {
        let ticket = self.begin_load();
        let page = api.list_tasks(filters).await?;
        Ok(self.finish_load(ticket, page.tasks))
    }

    /// Create on the store and append the returned record. The draft is
    /// validated locally first; the entry that lands in the board is the
    /// server's record, not the draft.
    pub async fn create(&mut self, api: &ApiClient, draft: &TaskDraft) -> ApiResult<Task> {
        draft.validate()?;
        let task = api.create_task(draft).await?;
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Update on the store and swap the returned record in by id. An id
    /// not currently visible (e.g. filtered into another period) leaves
    /// the board unchanged.
    pub async fn update(&mut self, api: &ApiClient, id: i64, patch: &TaskPatch) -> ApiResult<Task> {
        let task = api.update_task(id, patch).await?;
        self.replace(&task);
        Ok(task)
    }

    /// Flip completion on the store and swap the returned record in.
    pub async fn toggle(&mut self, api: &ApiClient, id: i64) -> ApiResult<Task> {
        let task = api.toggle_completion(id).await?;
        self.replace(&task);
        Ok(task)
    }

    /// Delete on the store, then drop the entry. Runs unconditionally:
    /// callers must have confirmed the destructive action already.
    pub async fn remove(&mut self, api: &ApiClient, id: i64) -> ApiResult<()> {
        api.delete_task(id).await?;
        self.tasks.retain(|task| task.id != id);
        Ok(())
    }

    fn replace(&mut self, task: &Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|entry| entry.id == task.id) {
            *slot = task.clone();
        }
    }
}
