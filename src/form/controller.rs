use std::sync::Arc;

use serde_json::{Map, Value};

use super::schema::{check_password_confirmation, FormSchema};
use crate::error::{ClientError, FieldErrors};
use crate::notify::{Alert, Notifier};
use crate::routing::{Route, Router};
use crate::services::ResourceService;
use crate::types::Operation;

#[derive(Debug)]
pub enum SubmitOutcome<E> {
    /// Saved and navigated to the list page; holds the record when the server echoed it
    Saved(Option<E>),
    /// Server rejected fields; messages are held inline
    Invalid(ClientError),
    /// Any other failure; an alert was raised
    Failed(ClientError),
    /// Stopped before sending anything
    Blocked(ClientError),
}

impl<E> SubmitOutcome<E> {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Saved(_))
    }

    pub fn into_result(self) -> Result<Option<E>, ClientError> {
        match self {
            SubmitOutcome::Saved(entity) => Ok(entity),
            SubmitOutcome::Invalid(e) | SubmitOutcome::Failed(e) | SubmitOutcome::Blocked(e) => Err(e),
        }
    }
}

/// Create/edit page state for one resource record
pub struct FormController<S: ResourceService> {
    service: Arc<S>,
    router: Arc<Router>,
    notifier: Arc<dyn Notifier>,
    schema: FormSchema,
    id: Option<u64>,
    values: Map<String, Value>,
    errors: FieldErrors,
}

impl<S: ResourceService> FormController<S> {
    /// `id` selects edit mode
    pub fn open(service: Arc<S>, router: Arc<Router>, notifier: Arc<dyn Notifier>, id: Option<u64>) -> Self {
        let schema = FormSchema::for_kind(service.kind());
        Self::with_schema(service, router, notifier, schema, id)
    }

    pub fn with_schema(
        service: Arc<S>,
        router: Arc<Router>,
        notifier: Arc<dyn Notifier>,
        schema: FormSchema,
        id: Option<u64>,
    ) -> Self {
        Self {
            values: schema.initial_values(),
            service,
            router,
            notifier,
            schema,
            id,
            errors: FieldErrors::new(),
        }
    }

    pub fn operation(&self) -> Operation {
        match self.id {
            Some(_) => Operation::Update,
            None => Operation::Create,
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Prefill from the server when editing; a create form keeps its defaults
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let Some(id) = self.id else {
            return Ok(());
        };
        match self.service.get(id).await {
            Ok(entity) => {
                let record = serde_json::to_value(&entity)?;
                self.values = self.schema.values_from(&record);
                Ok(())
            }
            Err(e) => {
                self.notifier.notify(Alert::error(e.message()));
                Err(e)
            }
        }
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) {
        self.values.insert(field.to_string(), value.into());
    }

    pub fn value(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Inline messages for one field, in server order
    pub fn errors_for(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// The full local state as sent on submit
    pub fn payload(&self) -> Value {
        Value::Object(self.values.clone())
    }

    pub async fn submit(&mut self) -> SubmitOutcome<S::Item> {
        self.errors.clear();

        if let Some(confirmation) = &self.schema.confirmation {
            let password = self.text(confirmation.password);
            let confirmed = self.text(confirmation.confirmation);
            if let Err(e) = check_password_confirmation(&password, &confirmed, confirmation.required) {
                self.notifier.notify(Alert::error(e.message()));
                return SubmitOutcome::Blocked(e);
            }
        }

        let kind = self.service.kind();
        let payload = self.payload();
        let result = match self.id {
            Some(id) => self.service.update(id, &payload).await,
            None => self.service.create(&payload).await,
        };

        match result {
            Ok(saved) => {
                let (title, verb) = match self.operation() {
                    Operation::Create => ("Created", "created"),
                    Operation::Update => ("Updated", "updated"),
                };
                self.notifier.notify(Alert::success(
                    title,
                    format!("{} {} successfully", kind.singular(), verb),
                ));
                self.router.navigate_to(kind.list_route());
                SubmitOutcome::Saved(saved)
            }
            Err(e) => match e.field_errors() {
                Some(fields) => {
                    tracing::debug!(fields = fields.len(), "submit rejected by validation");
                    self.errors = fields.clone();
                    SubmitOutcome::Invalid(e)
                }
                None => {
                    self.notifier.notify(Alert::error(e.message()));
                    SubmitOutcome::Failed(e)
                }
            },
        }
    }

    /// Leave without saving
    pub fn cancel(&self) -> Route {
        self.router.back()
    }

    fn text(&self, field: &str) -> String {
        match self.values.get(field) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ListQuery;
    use crate::form::PasswordConfirmation;
    use crate::models::{Envelope, ResourceKind, SessionUser, User};
    use crate::notify::AlertQueue;
    use crate::routing::RouteGuard;
    use crate::session::SessionContext;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockUsers {
        sent: Mutex<Vec<Value>>,
        reject_email: bool,
        silent_create: bool,
    }

    #[async_trait]
    impl ResourceService for MockUsers {
        type Item = User;

        fn kind(&self) -> ResourceKind {
            ResourceKind::Users
        }

        async fn list(&self, _query: &ListQuery) -> Result<Envelope<User>, ClientError> {
            Ok(Envelope::default())
        }

        async fn get(&self, id: u64) -> Result<User, ClientError> {
            Ok(serde_json::from_value(json!({"id": id, "name": "Asha", "email": "asha@example.com"}))?)
        }

        async fn create(&self, payload: &Value) -> Result<Option<User>, ClientError> {
            self.sent.lock().unwrap().push(payload.clone());
            if self.reject_email {
                let mut errors = FieldErrors::new();
                errors.insert("email".into(), vec!["already taken".into()]);
                return Err(ClientError::validation("The given data was invalid.", errors));
            }
            if self.silent_create {
                return Ok(None);
            }
            Ok(Some(serde_json::from_value(json!({
                "id": 10,
                "name": payload["name"],
                "email": payload["email"]
            }))?))
        }

        async fn update(&self, id: u64, payload: &Value) -> Result<Option<User>, ClientError> {
            self.sent.lock().unwrap().push(payload.clone());
            Ok(Some(serde_json::from_value(json!({"id": id}))?))
        }

        async fn remove(&self, _id: u64) -> Result<(), ClientError> {
            Ok(())
        }

        async fn bulk_remove(&self, _ids: &[u64]) -> Result<(), ClientError> {
            Ok(())
        }
    }

    fn router() -> Arc<Router> {
        let session = Arc::new(SessionContext::in_memory());
        session
            .establish(&SessionUser {
                id: 1,
                name: "Admin".into(),
                email: "admin@example.com".into(),
                token: "t".into(),
            })
            .unwrap();
        Arc::new(Router::new(RouteGuard::new(session)))
    }

    #[tokio::test]
    async fn validation_errors_stay_inline_without_navigation() {
        let service = Arc::new(MockUsers {
            reject_email: true,
            ..MockUsers::default()
        });
        let router = router();
        let alerts = Arc::new(AlertQueue::new());
        let mut form = FormController::open(service, router.clone(), alerts.clone(), None);
        form.set("email", "taken@example.com");

        let outcome = form.submit().await;
        assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
        assert_eq!(form.errors_for("email").to_vec(), vec!["already taken".to_string()]);
        assert!(form.errors_for("name").is_empty());
        assert_eq!(router.current(), Route::Home);
        assert!(alerts.is_empty());
    }

    #[tokio::test]
    async fn successful_create_navigates_to_list() {
        let service = Arc::new(MockUsers::default());
        let router = router();
        let mut form = FormController::open(service.clone(), router.clone(), Arc::new(AlertQueue::new()), None);
        form.set("name", "Ravi");
        form.set("email", "ravi@example.com");

        assert!(form.submit().await.is_saved());
        assert_eq!(router.current(), Route::List(ResourceKind::Users));
        let sent = service.sent.lock().unwrap()[0].clone();
        assert_eq!(sent["role"], json!("staff"));
        assert_eq!(sent["password"], json!(""));
    }

    #[tokio::test]
    async fn create_without_echoed_record_still_navigates() {
        let service = Arc::new(MockUsers {
            silent_create: true,
            ..MockUsers::default()
        });
        let router = router();
        let alerts = Arc::new(AlertQueue::new());
        let mut form = FormController::open(service, router.clone(), alerts.clone(), None);
        form.set("name", "Ravi");

        assert!(matches!(form.submit().await, SubmitOutcome::Saved(None)));
        assert_eq!(router.current(), Route::List(ResourceKind::Users));
        assert_eq!(alerts.drain()[0].message, "User created successfully");
    }

    #[tokio::test]
    async fn edit_form_prefills_and_updates() {
        let service = Arc::new(MockUsers::default());
        let mut form = FormController::open(service.clone(), router(), Arc::new(AlertQueue::new()), Some(7));
        assert_eq!(form.operation(), Operation::Update);
        form.load().await.unwrap();
        assert_eq!(form.value("name"), Some(&json!("Asha")));
        assert_eq!(form.value("password"), Some(&json!("")));

        form.submit().await.into_result().unwrap();
        assert_eq!(service.sent.lock().unwrap()[0]["email"], json!("asha@example.com"));
    }

    #[tokio::test]
    async fn mismatched_confirmation_blocks_submit() {
        let service = Arc::new(MockUsers::default());
        let alerts = Arc::new(AlertQueue::new());
        let schema = FormSchema::for_kind(ResourceKind::Users).with_confirmation(PasswordConfirmation {
            password: "password",
            confirmation: "confirmed_password",
            required: true,
        });
        let mut form = FormController::with_schema(service.clone(), router(), alerts.clone(), schema, None);
        form.set("password", "secret1");
        form.set("confirmed_password", "secret2");

        assert!(matches!(form.submit().await, SubmitOutcome::Blocked(ClientError::PasswordMismatch)));
        assert!(service.sent.lock().unwrap().is_empty());
        assert_eq!(alerts.drain()[0].message, "Passwords do not match!");
    }
}
