//! Behaviour tests for the session lifecycle and dashboard loading.
//!
//! These scenarios drive the real session manager and dashboard service
//! against an in-process backend double.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

// Shared helpers include items unused by this suite.
#[allow(dead_code)]
mod support;

use std::cell::RefCell;
use std::sync::Arc;

use portal_client::Portal;
use portal_client::domain::dashboard::DashboardView;
use portal_client::domain::ports::InMemoryTokenStore;
use portal_client::domain::{ApprovalStatus, Error, ErrorCode, User};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;

use support::fake_backend::{FakeBackend, barangay_user};

const EMAIL: &str = "captain@sanisidro.gov.ph";
const PASSWORD: &str = "correct horse";

struct SessionWorld {
    runtime: Runtime,
    backend: Arc<FakeBackend>,
    store: RefCell<Arc<InMemoryTokenStore>>,
    portal: RefCell<Option<Portal>>,
    login: RefCell<Option<Result<User, Error>>>,
    dashboard: RefCell<Option<Result<DashboardView, Error>>>,
}

impl SessionWorld {
    fn new() -> Self {
        Self {
            runtime: tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("create runtime"),
            backend: Arc::new(FakeBackend::default()),
            store: RefCell::new(Arc::new(InMemoryTokenStore::default())),
            portal: RefCell::new(None),
            login: RefCell::new(None),
            dashboard: RefCell::new(None),
        }
    }

    fn portal(&self) -> std::cell::RefMut<'_, Option<Portal>> {
        let mut portal = self.portal.borrow_mut();
        if portal.is_none() {
            *portal = Some(Portal::new(
                self.backend.clone(),
                self.backend.clone(),
                self.backend.clone(),
                self.store.borrow().clone(),
            ));
        }
        portal
    }

    fn with_portal<T>(&self, f: impl FnOnce(&Portal) -> T) -> T {
        let portal = self.portal();
        f(portal.as_ref().expect("portal wired"))
    }

    fn sign_in(&self, password: &str) {
        let result = self.with_portal(|portal| {
            self.runtime
                .block_on(portal.sessions().login(EMAIL, password))
        });
        *self.login.borrow_mut() = Some(result);
    }
}

#[fixture]
fn world() -> SessionWorld {
    SessionWorld::new()
}

#[given("a backend with an approved barangay account")]
fn a_backend_with_an_approved_barangay_account(world: &SessionWorld) {
    world
        .backend
        .add_account(PASSWORD, barangay_user(EMAIL, ApprovalStatus::Approved));
}

#[given("an empty token store")]
fn an_empty_token_store(world: &SessionWorld) {
    *world.store.borrow_mut() = Arc::new(InMemoryTokenStore::default());
}

#[given("a token store holding a valid token")]
fn a_token_store_holding_a_valid_token(world: &SessionWorld) {
    let token = world.backend.issue_token(EMAIL);
    *world.store.borrow_mut() = Arc::new(InMemoryTokenStore::with_value(token));
}

#[given("a token store holding a revoked token")]
fn a_token_store_holding_a_revoked_token(world: &SessionWorld) {
    let token = world.backend.issue_token(EMAIL);
    world.backend.revoke_all();
    *world.store.borrow_mut() = Arc::new(InMemoryTokenStore::with_value(token));
}

#[given("the population source is failing")]
fn the_population_source_is_failing(world: &SessionWorld) {
    world.backend.fail_source("population");
}

#[when("the session initializes")]
fn the_session_initializes(world: &SessionWorld) {
    world.with_portal(|portal| world.runtime.block_on(portal.sessions().initialize()));
}

#[when("the user signs in with the correct password")]
fn the_user_signs_in_with_the_correct_password(world: &SessionWorld) {
    world.sign_in(PASSWORD);
}

#[when("the user signs in with a wrong password")]
fn the_user_signs_in_with_a_wrong_password(world: &SessionWorld) {
    world.sign_in("wrong password");
}

#[when("the user signs out")]
fn the_user_signs_out(world: &SessionWorld) {
    world
        .with_portal(|portal| world.runtime.block_on(portal.sessions().logout()))
        .expect("logout succeeds");
}

#[when("the backend revokes every token")]
fn the_backend_revokes_every_token(world: &SessionWorld) {
    world.backend.revoke_all();
}

#[when("the dashboard loads")]
fn the_dashboard_loads(world: &SessionWorld) {
    let result = world.with_portal(|portal| world.runtime.block_on(portal.dashboard().load()));
    *world.dashboard.borrow_mut() = Some(result);
}

#[then("the session is authenticated")]
fn the_session_is_authenticated(world: &SessionWorld) {
    let session = world.with_portal(|portal| portal.sessions().session());
    assert!(session.is_authenticated());
    assert!(session.is_approved());
    assert_eq!(session.user().map(User::email), Some(EMAIL));
}

#[then("the session is signed out")]
fn the_session_is_signed_out(world: &SessionWorld) {
    let session = world.with_portal(|portal| portal.sessions().session());
    assert!(!session.is_authenticated());
    assert!(!session.is_barangay());
    assert!(!session.is_approved());
    assert!(session.user().is_none());
    assert!(session.token().is_none());
}

#[then("the token store holds a token")]
fn the_token_store_holds_a_token(world: &SessionWorld) {
    assert!(world.store.borrow().peek().is_some());
}

#[then("the token store is empty")]
fn the_token_store_is_empty(world: &SessionWorld) {
    assert!(world.store.borrow().peek().is_none());
}

#[then("the sign-in fails with \"{message}\"")]
fn the_sign_in_fails_with(world: &SessionWorld, message: String) {
    let login = world.login.borrow();
    let error = login
        .as_ref()
        .expect("sign-in attempted")
        .as_ref()
        .expect_err("sign-in should fail");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert_eq!(error.message(), message);
}

#[then("the dashboard load is refused as unauthorized")]
fn the_dashboard_load_is_refused_as_unauthorized(world: &SessionWorld) {
    let dashboard = world.dashboard.borrow();
    let error = dashboard
        .as_ref()
        .expect("dashboard loaded")
        .as_ref()
        .expect_err("load should be refused");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[then("the dashboard reports a partial failure")]
fn the_dashboard_reports_a_partial_failure(world: &SessionWorld) {
    let dashboard = world.dashboard.borrow();
    let view = dashboard
        .as_ref()
        .expect("dashboard loaded")
        .as_ref()
        .expect("load succeeds");
    assert!(view.partial_failure());
    assert!(!view.auth_expired());
}

#[then("the incidents slot still shows {count} incidents")]
fn the_incidents_slot_still_shows(world: &SessionWorld, count: String) {
    let count: u64 = count.parse().expect("numeric count");
    let dashboard = world.dashboard.borrow();
    let Some(Ok(DashboardView::Barangay(snapshot))) = dashboard.as_ref() else {
        panic!("expected a barangay dashboard");
    };
    assert_eq!(snapshot.data().incidents.total, count);
    assert_eq!(snapshot.data().population.total_population, 0);
}

#[scenario(
    path = "tests/features/session_lifecycle.feature",
    name = "Signing in persists the token"
)]
fn signing_in_persists_the_token(world: SessionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session_lifecycle.feature",
    name = "A rejected sign-in keeps the user signed out"
)]
fn a_rejected_sign_in_keeps_the_user_signed_out(world: SessionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session_lifecycle.feature",
    name = "A persisted token is restored on startup"
)]
fn a_persisted_token_is_restored_on_startup(world: SessionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session_lifecycle.feature",
    name = "A revoked persisted token fails closed"
)]
fn a_revoked_persisted_token_fails_closed(world: SessionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session_lifecycle.feature",
    name = "Signing out clears every capability"
)]
fn signing_out_clears_every_capability(world: SessionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session_lifecycle.feature",
    name = "An expired token during a dashboard load signs the user out"
)]
fn an_expired_token_during_a_dashboard_load_signs_the_user_out(world: SessionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session_lifecycle.feature",
    name = "A broken source degrades the dashboard instead of blanking it"
)]
fn a_broken_source_degrades_the_dashboard(world: SessionWorld) {
    drop(world);
}
