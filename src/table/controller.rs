use std::sync::Arc;

use serde_json::{Map, Value};

use super::column::{Cell, ColumnDef};
use super::form::{FormSchema, FormValues};
use super::state::TableState;
use crate::api::{ApiClient, Resource};
use crate::error::ClientError;
use crate::interaction::{Confirm, Notifier};
use crate::models::{AuthUser, Page};

/// Where paging and search happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMode {
    /// `page`/`limit`/`search` go to the backend; its total is trusted.
    Server,
    /// The whole collection is fetched once, then filtered and sliced here.
    Client,
}

/// Create/edit modal state. Only a successful submit closes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Closed,
    Create,
    Edit(String),
}

/// Per-row buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit,
    Delete,
    Cancel,
    Join,
    Pay,
    Verify,
}

/// Everything that distinguishes one entity table from another.
pub struct EntityConfig<R: Resource> {
    pub title: &'static str,
    pub columns: Vec<ColumnDef<R>>,
    pub pagination: PaginationMode,
    pub create_form: Option<FormSchema>,
    pub edit_form: Option<FormSchema>,
    /// Rewrites a schema-built create body before it is decoded, for
    /// payloads with nested fields.
    pub shape_create: Option<fn(&mut Map<String, Value>)>,
    pub actions: fn(Option<&AuthUser>, &R) -> Vec<RowAction>,
}

/// Generic list/search/paginate/create/edit/delete controller.
pub struct EntityTable<R: Resource> {
    client: Arc<ApiClient>,
    confirm: Arc<dyn Confirm>,
    notifier: Notifier,
    config: EntityConfig<R>,
    state: TableState,
    page: Page<R>,
    /// Full collection in client pagination mode.
    all: Vec<R>,
    modal: Modal,
    last_error: Option<String>,
}

impl<R: Resource> EntityTable<R> {
    pub fn new(
        client: Arc<ApiClient>,
        confirm: Arc<dyn Confirm>,
        notifier: Notifier,
        config: EntityConfig<R>,
    ) -> Self {
        let state = TableState::new(client.config().default_page_size);
        Self {
            client,
            confirm,
            notifier,
            config,
            state,
            page: Page::empty(),
            all: Vec::new(),
            modal: Modal::Closed,
            last_error: None,
        }
    }

    pub fn title(&self) -> &'static str {
        self.config.title
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    /// Message of the last failed load, shown in place of the rows.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn rows(&self) -> &[R] {
        &self.page.items
    }

    pub fn total(&self) -> usize {
        self.page.total
    }

    pub fn page_count(&self) -> usize {
        self.page.page_count(self.state.page_size())
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.config.columns.iter().map(|c| c.header).collect()
    }

    /// Rendered cells of the current page, row by row.
    pub fn cells(&self) -> Vec<Vec<Cell>> {
        self.page
            .items
            .iter()
            .map(|row| self.config.columns.iter().map(|c| c.cell(row)).collect())
            .collect()
    }

    /// Buttons for a row, for the signed-in user.
    pub fn actions(&self, row: &R) -> Vec<RowAction> {
        let user = self.client.session().current_user();
        (self.config.actions)(user.as_ref(), row)
    }

    // ─── Loading ──────────────────────────────────────────────────────────────

    /// Fetch rows for the current state. Failures are reported and kept in
    /// `last_error`; the previous rows stay visible.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let result = match self.config.pagination {
            PaginationMode::Server => self.client.list::<R>(&self.state.query()).await.map(|page| {
                self.page = page;
            }),
            PaginationMode::Client => self.client.fetch_all::<R>().await.map(|all| {
                self.all = all;
                self.apply_client_view();
            }),
        };

        match result {
            Ok(()) => {
                self.last_error = None;
                tracing::debug!(resource = R::PATH, rows = self.page.items.len(), total = self.page.total, "Table loaded");
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(err.user_message());
                self.notifier.failure(&format!("load {}", R::PATH), &err);
                Err(err)
            }
        }
    }

    fn apply_client_view(&mut self) {
        let term = self.state.search().trim().to_lowercase();
        let filtered: Vec<R> = self
            .all
            .iter()
            .filter(|row| term.is_empty() || self.matches(row, &term))
            .cloned()
            .collect();
        self.state.set_page(self.state.page_index(), filtered.len());
        self.page = Page::from_slice(filtered, self.state.page_index(), self.state.page_size());
    }

    fn matches(&self, row: &R, term: &str) -> bool {
        self.config
            .columns
            .iter()
            .filter(|c| c.searchable)
            .any(|c| c.value(row).search_text().to_lowercase().contains(term))
    }

    async fn refresh(&mut self) -> Result<(), ClientError> {
        match self.config.pagination {
            PaginationMode::Server => self.load().await,
            PaginationMode::Client => {
                self.apply_client_view();
                Ok(())
            }
        }
    }

    pub async fn set_search(&mut self, term: &str) -> Result<(), ClientError> {
        self.state.set_search(term);
        self.refresh().await
    }

    /// Returns `Ok(false)` when there is no next page.
    pub async fn next_page(&mut self) -> Result<bool, ClientError> {
        if !self.state.next_page(self.page.total) {
            return Ok(false);
        }
        self.refresh().await.map(|_| true)
    }

    pub async fn prev_page(&mut self) -> Result<bool, ClientError> {
        if !self.state.prev_page() {
            return Ok(false);
        }
        self.refresh().await.map(|_| true)
    }

    pub async fn set_page_size(&mut self, page_size: usize) -> Result<(), ClientError> {
        self.state.set_page_size(page_size);
        self.refresh().await
    }

    // ─── Modal ────────────────────────────────────────────────────────────────

    pub fn open_create(&mut self) -> Result<(), ClientError> {
        if self.config.create_form.is_none() {
            return Err(ClientError::ActionDisabled("this table has no create form"));
        }
        self.modal = Modal::Create;
        Ok(())
    }

    /// Open the edit modal for a loaded row and return its pre-filled values.
    pub fn open_edit(&mut self, id: &str) -> Result<FormValues, ClientError> {
        let schema = self
            .config
            .edit_form
            .as_ref()
            .ok_or(ClientError::ActionDisabled("this table has no edit form"))?;
        let row = self
            .page
            .items
            .iter()
            .find(|r| r.id() == id)
            .ok_or(ClientError::ActionDisabled("row is not on the current page"))?;
        let values = schema.prefill(row);
        self.modal = Modal::Edit(id.to_string());
        Ok(values)
    }

    pub fn close_modal(&mut self) {
        self.modal = Modal::Closed;
    }

    /// Submit whichever modal is open.
    pub async fn submit(&mut self, values: &FormValues) -> Result<Option<R>, ClientError> {
        match self.modal.clone() {
            Modal::Closed => Err(ClientError::ActionDisabled("no form is open")),
            Modal::Create => self.submit_create(values).await,
            Modal::Edit(id) => self.submit_update(&id, values).await,
        }
    }

    // ─── Mutations ────────────────────────────────────────────────────────────

    pub async fn submit_create(&mut self, values: &FormValues) -> Result<Option<R>, ClientError> {
        let result = self.try_create(values).await;
        self.finish_mutation(result, "create", "created").await
    }

    async fn try_create(&self, values: &FormValues) -> Result<Option<R>, ClientError> {
        let schema = self
            .config
            .create_form
            .as_ref()
            .ok_or(ClientError::ActionDisabled("this table has no create form"))?;
        schema.validate(values)?;
        let mut body = schema.to_payload(values);
        if let (Some(shape), Value::Object(map)) = (self.config.shape_create, &mut body) {
            shape(map);
        }
        let payload: R::Create = decode_form(body)?;
        self.client.create::<R>(&payload).await
    }

    pub async fn submit_update(&mut self, id: &str, values: &FormValues) -> Result<Option<R>, ClientError> {
        let result = self.try_update(id, values).await;
        self.finish_mutation(result, "update", "updated").await
    }

    async fn try_update(&self, id: &str, values: &FormValues) -> Result<Option<R>, ClientError> {
        let schema = self
            .config
            .edit_form
            .as_ref()
            .ok_or(ClientError::ActionDisabled("this table has no edit form"))?;
        schema.validate(values)?;
        let payload: R::Update = decode_form(schema.to_payload(values))?;
        self.client.update::<R>(id, &payload).await
    }

    /// Ask for confirmation, delete, then refetch. Returns `Ok(false)` when
    /// the user declined. The row stays visible until the refetch.
    pub async fn delete(&mut self, id: &str) -> Result<bool, ClientError> {
        let prompt = format!("Are you sure you want to delete this {}?", R::LABEL.to_lowercase());
        if !self.confirm.confirm(&prompt) {
            return Ok(false);
        }
        let result = self.client.delete::<R>(id).await.map(|()| None);
        self.finish_mutation(result, "delete", "deleted").await.map(|_| true)
    }

    async fn finish_mutation(
        &mut self,
        result: Result<Option<R>, ClientError>,
        verb: &str,
        past: &str,
    ) -> Result<Option<R>, ClientError> {
        match result {
            Ok(row) => {
                self.modal = Modal::Closed;
                self.notifier.success(format!("{} {past} successfully", R::LABEL));
                self.reload_after_mutation().await;
                Ok(row)
            }
            Err(err) => {
                self.notifier.failure(&format!("{verb} {}", R::PATH), &err);
                Err(err)
            }
        }
    }

    /// Refetch, stepping back when the current page no longer exists (last
    /// row of the last page deleted). Failures are reported by `load`.
    async fn reload_after_mutation(&mut self) {
        if self.load().await.is_err() || self.config.pagination != PaginationMode::Server {
            return;
        }
        let before = self.state.page_index();
        self.state.set_page(before, self.page.total);
        if self.state.page_index() != before {
            tracing::debug!(resource = R::PATH, from = before, to = self.state.page_index(), "Page emptied, stepping back");
            let _ = self.load().await;
        }
    }
}

fn decode_form<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, ClientError> {
    serde_json::from_value(body).map_err(|e| ClientError::validation("form", e.to_string()))
}
