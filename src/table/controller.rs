use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use super::debounce::Debouncer;
use super::footer::TableFooter;
use crate::api::ListQuery;
use crate::error::ClientError;
use crate::models::{Entity, Envelope, PageMeta, ResourceKind, StatusEntity, TablePreset};
use crate::notify::{Alert, Notifier};
use crate::services::{ResourceService, StatusToggle};
use crate::types::SortDirection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableStatus {
    Idle,
    Loading,
    Loaded,
    Errored(String),
}

/// Identifies one issued list request; only the latest may be applied
#[derive(Debug, Clone)]
pub struct FetchTicket {
    pub seq: u64,
    pub query: ListQuery,
}

/// Query state and rows of one list page
pub struct TableController<S: ResourceService> {
    service: Arc<S>,
    notifier: Arc<dyn Notifier>,
    preset: TablePreset,
    query: ListQuery,
    search_input: Debouncer<String>,
    status: TableStatus,
    envelope: Envelope<S::Item>,
    issued: u64,
}

impl<S: ResourceService> TableController<S> {
    pub fn new(service: Arc<S>, notifier: Arc<dyn Notifier>) -> Self {
        let debounce = crate::config::config().search_debounce();
        Self::with_debounce(service, notifier, debounce)
    }

    pub fn with_debounce(service: Arc<S>, notifier: Arc<dyn Notifier>, debounce: Duration) -> Self {
        let preset = service.kind().preset();
        Self {
            query: ListQuery::from_preset(&preset),
            service,
            notifier,
            preset,
            search_input: Debouncer::new(debounce),
            status: TableStatus::Idle,
            envelope: Envelope::default(),
            issued: 0,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.service.kind()
    }

    pub fn rows(&self) -> &[S::Item] {
        &self.envelope.data
    }

    pub fn meta(&self) -> &PageMeta {
        &self.envelope.meta
    }

    pub fn envelope(&self) -> &Envelope<S::Item> {
        &self.envelope
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn status(&self) -> &TableStatus {
        &self.status
    }

    pub fn preset(&self) -> &TablePreset {
        &self.preset
    }

    /// Header marker for `column`, if it is the active sort
    pub fn sort_indicator(&self, column: &str) -> Option<&'static str> {
        (self.preset.sortable && self.query.sort == column).then(|| self.query.dir.arrow())
    }

    pub fn footer(&self) -> TableFooter {
        TableFooter::new(self.service.kind(), &self.envelope.meta)
    }

    /// Record a new request; any ticket issued earlier becomes stale
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.status = TableStatus::Loading;
        FetchTicket {
            seq: self.issued,
            query: self.query.clone(),
        }
    }

    /// Apply a response; returns false when the ticket was superseded
    pub fn apply(&mut self, ticket: FetchTicket, result: Result<Envelope<S::Item>, ClientError>) -> bool {
        if ticket.seq != self.issued {
            tracing::warn!(
                seq = ticket.seq,
                latest = self.issued,
                "discarding stale list response"
            );
            return false;
        }
        match result {
            Ok(envelope) => {
                self.envelope = envelope;
                self.status = TableStatus::Loaded;
            }
            Err(e) => {
                self.status = TableStatus::Errored(e.message());
                self.notifier.notify(Alert::error(e.message()));
            }
        }
        true
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        let ticket = self.begin_fetch();
        let result = self.service.list(&ticket.query).await;
        let outcome = result.as_ref().map(|_| ()).map_err(Clone::clone);
        self.apply(ticket, result);
        outcome
    }

    pub async fn set_page(&mut self, page: u32) -> Result<(), ClientError> {
        let page = page.max(1);
        if page == self.query.page && self.status == TableStatus::Loaded {
            return Ok(());
        }
        self.query.page = page;
        self.load().await
    }

    pub async fn next_page(&mut self) -> Result<(), ClientError> {
        let last = self.envelope.meta.last_page.max(1);
        self.set_page((self.query.page + 1).min(last)).await
    }

    pub async fn prev_page(&mut self) -> Result<(), ClientError> {
        self.set_page(self.query.page.saturating_sub(1).max(1)).await
    }

    /// Same column flips direction, a new column starts ascending
    pub async fn toggle_sort(&mut self, column: &str) -> Result<(), ClientError> {
        if !self.preset.sortable {
            return Ok(());
        }
        if self.query.sort == column {
            self.query.dir = self.query.dir.flipped();
        } else {
            self.query.sort = column.to_string();
            self.query.dir = SortDirection::Asc;
        }
        self.query.page = 1;
        self.load().await
    }

    /// An empty value clears the filter
    pub async fn set_filter(&mut self, key: &str, value: &str) -> Result<(), ClientError> {
        if !self.preset.filter_keys.contains(&key) {
            let mut errors = BTreeMap::new();
            errors.insert(
                key.to_string(),
                vec![format!("not a filter for {}", self.service.kind().plural())],
            );
            return Err(ClientError::validation("Unknown filter", errors));
        }
        if value.is_empty() {
            self.query.filters.remove(key);
        } else {
            self.query.filters.insert(key.to_string(), value.to_string());
        }
        self.query.page = 1;
        self.load().await
    }

    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.query.page = 1;
        self.load().await
    }

    /// Stage raw search text; nothing is fetched until it settles
    pub fn type_search(&mut self, text: impl Into<String>) {
        self.search_input.push(text.into());
    }

    pub fn has_pending_search(&self) -> bool {
        self.search_input.is_pending()
    }

    /// Wait for the typing pause, then apply the last staged text
    pub async fn settle_search(&mut self) -> Result<(), ClientError> {
        match self.search_input.settled().await {
            Some(text) => self.apply_search(text).await,
            None => Ok(()),
        }
    }

    /// Apply staged text only if its quiet period already passed
    pub async fn poll_search(&mut self) -> Result<(), ClientError> {
        match self.search_input.take_ready() {
            Some(text) => self.apply_search(text).await,
            None => Ok(()),
        }
    }

    /// Skip the debounce, e.g. for a search passed on the command line
    pub async fn search_now(&mut self, text: impl Into<String>) -> Result<(), ClientError> {
        self.search_input.cancel();
        self.apply_search(text.into()).await
    }

    async fn apply_search(&mut self, text: String) -> Result<(), ClientError> {
        if text == self.query.search {
            return Ok(());
        }
        tracing::debug!(search = %text, "search applied");
        self.query.search = text;
        self.query.page = 1;
        self.load().await
    }

    /// Remove one row, then reload; an emptied page falls back one page
    pub async fn delete(&mut self, id: u64) -> Result<(), ClientError> {
        if let Err(e) = self.service.remove(id).await {
            self.notifier.notify(Alert::error(e.message()));
            return Err(e);
        }
        self.notifier.notify(Alert::success(
            "Deleted",
            format!("{} deleted successfully", self.service.kind().singular()),
        ));
        if self.envelope.data.len() == 1 && self.query.page > 1 {
            self.query.page -= 1;
        }
        self.load().await
    }

    pub async fn bulk_delete(&mut self, ids: &[u64]) -> Result<(), ClientError> {
        if ids.is_empty() {
            return Ok(());
        }
        if let Err(e) = self.service.bulk_remove(ids).await {
            self.notifier.notify(Alert::error(e.message()));
            return Err(e);
        }
        self.notifier.notify(Alert::success(
            "Deleted",
            format!("{} {} deleted successfully", ids.len(), self.service.kind().plural()),
        ));
        if ids.len() >= self.envelope.data.len() && self.query.page > 1 {
            self.query.page -= 1;
        }
        self.load().await
    }

    fn row_mut(&mut self, id: u64) -> Option<&mut S::Item> {
        self.envelope.data.iter_mut().find(|row| row.id() == id)
    }
}

impl<S> TableController<S>
where
    S: StatusToggle,
    S::Item: StatusEntity,
{
    /// Flip one row's status and patch just that row from the response
    pub async fn toggle_status(&mut self, id: u64) -> Result<bool, ClientError> {
        let current = match self.row_mut(id) {
            Some(row) => row.status(),
            None => return Err(ClientError::NotFound(format!("No row with id {} on this page", id))),
        };
        match self.service.toggle_status(id, !current).await {
            Ok(status) => {
                if let Some(row) = self.row_mut(id) {
                    row.set_status(status);
                }
                self.notifier.notify(Alert::success(
                    "Status Updated",
                    format!("{} status updated successfully", self.service.kind().singular()),
                ));
                Ok(status)
            }
            Err(e) => {
                self.notifier.notify(Alert::error(e.message()));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MasterData;
    use crate::notify::AlertQueue;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;

    /// In-memory master data collection paging like the backend
    struct MockService {
        rows: Mutex<Vec<MasterData>>,
        queries: Mutex<Vec<ListQuery>>,
        fail_toggle: bool,
    }

    impl MockService {
        fn with_rows(count: u64) -> Self {
            let rows = (1..=count)
                .rev()
                .map(|id| MasterData {
                    id,
                    kind: "Category".into(),
                    name: format!("Item {}", id),
                    code: None,
                    parent_id: None,
                    parent: None,
                    description: None,
                    status: true,
                })
                .collect();
            Self {
                rows: Mutex::new(rows),
                queries: Mutex::new(Vec::new()),
                fail_toggle: false,
            }
        }

        fn list_calls(&self) -> usize {
            self.queries.lock().unwrap().len()
        }

        fn last_query(&self) -> ListQuery {
            self.queries.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl ResourceService for MockService {
        type Item = MasterData;

        fn kind(&self) -> ResourceKind {
            ResourceKind::MasterData
        }

        async fn list(&self, query: &ListQuery) -> Result<Envelope<MasterData>, ClientError> {
            self.queries.lock().unwrap().push(query.clone());
            let rows = self.rows.lock().unwrap();
            let per_page = query.per_page as usize;
            let total = rows.len();
            let last_page = ((total + per_page - 1) / per_page).max(1) as u32;
            let start = (query.page as usize - 1) * per_page;
            let data: Vec<MasterData> = rows.iter().skip(start).take(per_page).cloned().collect();
            Ok(Envelope {
                meta: PageMeta {
                    current_page: query.page,
                    last_page,
                    total: total as u64,
                    from: (!data.is_empty()).then(|| start as u64 + 1),
                    to: (!data.is_empty()).then(|| (start + data.len()) as u64),
                    per_page: Some(query.per_page),
                },
                data,
                ..Envelope::default()
            })
        }

        async fn get(&self, id: u64) -> Result<MasterData, ClientError> {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == id)
                .cloned()
                .ok_or_else(|| ClientError::NotFound("missing".into()))
        }

        async fn create(&self, _payload: &Value) -> Result<Option<MasterData>, ClientError> {
            unimplemented!()
        }

        async fn update(&self, _id: u64, _payload: &Value) -> Result<Option<MasterData>, ClientError> {
            unimplemented!()
        }

        async fn remove(&self, id: u64) -> Result<(), ClientError> {
            self.rows.lock().unwrap().retain(|r| r.id != id);
            Ok(())
        }

        async fn bulk_remove(&self, ids: &[u64]) -> Result<(), ClientError> {
            self.rows.lock().unwrap().retain(|r| !ids.contains(&r.id));
            Ok(())
        }
    }

    #[async_trait]
    impl StatusToggle for MockService {
        async fn toggle_status(&self, id: u64, status: bool) -> Result<bool, ClientError> {
            if self.fail_toggle {
                return Err(ClientError::Server {
                    status: 500,
                    message: "Toggle failed".into(),
                });
            }
            if let Some(row) = self.rows.lock().unwrap().iter_mut().find(|r| r.id == id) {
                row.status = status;
            }
            Ok(status)
        }
    }

    fn controller(service: Arc<MockService>) -> (TableController<MockService>, Arc<AlertQueue>) {
        let alerts = Arc::new(AlertQueue::new());
        let table = TableController::with_debounce(service, alerts.clone(), Duration::from_millis(500));
        (table, alerts)
    }

    #[tokio::test]
    async fn sort_toggle_flips_then_resets() {
        let service = Arc::new(MockService::with_rows(30));
        let (mut table, _) = controller(service.clone());
        table.set_page(2).await.unwrap();

        table.toggle_sort("name").await.unwrap();
        assert_eq!(service.last_query().sort, "name");
        assert_eq!(service.last_query().dir, SortDirection::Asc);
        assert_eq!(service.last_query().page, 1);

        table.toggle_sort("name").await.unwrap();
        assert_eq!(service.last_query().dir, SortDirection::Desc);
        assert_eq!(table.sort_indicator("name"), Some("▼"));

        table.toggle_sort("code").await.unwrap();
        assert_eq!(service.last_query().dir, SortDirection::Asc);
    }

    #[tokio::test]
    async fn unchanged_page_does_not_refetch() {
        let service = Arc::new(MockService::with_rows(30));
        let (mut table, _) = controller(service.clone());
        table.load().await.unwrap();
        table.set_page(1).await.unwrap();
        assert_eq!(service.list_calls(), 1);

        table.next_page().await.unwrap();
        table.next_page().await.unwrap();
        table.next_page().await.unwrap();
        assert_eq!(table.query().page, 3);
        assert_eq!(service.list_calls(), 3);
    }

    #[tokio::test]
    async fn deleting_last_row_on_page_steps_back() {
        // 21 rows at 10 per page leaves one row on page 3
        let service = Arc::new(MockService::with_rows(21));
        let (mut table, alerts) = controller(service.clone());
        table.set_page(3).await.unwrap();
        assert_eq!(table.rows().len(), 1);

        let only = table.rows()[0].id;
        table.delete(only).await.unwrap();
        assert_eq!(service.last_query().page, 2);
        assert_eq!(table.rows().len(), 10);
        assert_eq!(alerts.drain()[0].title, "Deleted");
    }

    #[tokio::test]
    async fn deleting_from_full_page_refetches_same_page() {
        let service = Arc::new(MockService::with_rows(21));
        let (mut table, _) = controller(service.clone());
        table.set_page(2).await.unwrap();
        let id = table.rows()[0].id;
        table.delete(id).await.unwrap();
        assert_eq!(service.last_query().page, 2);
        assert_eq!(table.meta().total, 20);
    }

    #[tokio::test]
    async fn bulk_delete_of_whole_page_steps_back() {
        let service = Arc::new(MockService::with_rows(15));
        let (mut table, _) = controller(service.clone());
        table.set_page(2).await.unwrap();
        let ids: Vec<u64> = table.rows().iter().map(|r| r.id).collect();
        table.bulk_delete(&ids).await.unwrap();
        assert_eq!(service.last_query().page, 1);
    }

    #[tokio::test]
    async fn status_toggle_patches_row_without_refetch() {
        let service = Arc::new(MockService::with_rows(3));
        let (mut table, alerts) = controller(service.clone());
        table.load().await.unwrap();

        let status = table.toggle_status(2).await.unwrap();
        assert!(!status);
        let row = table.rows().iter().find(|r| r.id == 2).unwrap();
        assert!(!row.status);
        assert_eq!(service.list_calls(), 1);
        assert_eq!(alerts.drain()[0].title, "Status Updated");
    }

    #[tokio::test]
    async fn failed_toggle_leaves_row_untouched() {
        let mut mock = MockService::with_rows(2);
        mock.fail_toggle = true;
        let (mut table, alerts) = controller(Arc::new(mock));
        table.load().await.unwrap();

        assert!(table.toggle_status(1).await.is_err());
        assert!(table.rows().iter().all(|r| r.status));
        assert_eq!(alerts.drain()[0].message, "Toggle failed");
    }

    #[tokio::test]
    async fn stale_response_is_discarded() {
        let service = Arc::new(MockService::with_rows(5));
        let (mut table, _) = controller(service);

        let first = table.begin_fetch();
        let second = table.begin_fetch();
        let newer = Envelope {
            data: vec![],
            meta: PageMeta {
                total: 99,
                ..PageMeta::default()
            },
            ..Envelope::default()
        };
        assert!(table.apply(second, Ok(newer)));
        assert!(!table.apply(first, Err(ClientError::network())));
        assert_eq!(table.meta().total, 99);
        assert_eq!(table.status(), &TableStatus::Loaded);
    }

    #[tokio::test(start_paused = true)]
    async fn search_fetches_once_after_typing_pause() {
        let service = Arc::new(MockService::with_rows(5));
        let (mut table, _) = controller(service.clone());
        table.set_page(1).await.unwrap();

        table.type_search("r");
        tokio::time::advance(Duration::from_millis(100)).await;
        table.type_search("ra");
        tokio::time::advance(Duration::from_millis(100)).await;
        table.type_search("rav");
        table.poll_search().await.unwrap();
        assert_eq!(service.list_calls(), 1);

        table.settle_search().await.unwrap();
        assert_eq!(service.list_calls(), 2);
        assert_eq!(service.last_query().search, "rav");

        // Same text again is not a change
        table.type_search("rav");
        table.settle_search().await.unwrap();
        assert_eq!(service.list_calls(), 2);
    }

    #[tokio::test]
    async fn unknown_filter_is_rejected_and_empty_clears() {
        let service = Arc::new(MockService::with_rows(5));
        let (mut table, _) = controller(service.clone());
        assert!(table.set_filter("colour", "red").await.is_err());

        table.set_filter("type", "Category").await.unwrap();
        assert_eq!(service.last_query().filters.get("type").map(String::as_str), Some("Category"));
        table.set_filter("type", "").await.unwrap();
        assert!(service.last_query().filters.is_empty());
    }
}
