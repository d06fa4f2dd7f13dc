//! Behaviour tests for route guarding and redirects.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

// Shared helpers include items unused by this suite.
#[allow(dead_code)]
mod support;

use std::cell::RefCell;

use portal_client::domain::{AccessToken, ApprovalStatus, Session, User};
use portal_client::inbound::routing::{GuardState, Navigator, RouteTable};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::sync::watch;

use support::fake_backend::{admin_user, barangay_user};

struct RouteWorld {
    sessions: watch::Sender<Session>,
    navigator: RefCell<Option<Navigator>>,
}

impl RouteWorld {
    fn sign_in(&self, user: User) {
        let token = AccessToken::parse("7|route-token").expect("token");
        self.sessions.send_replace(Session::authenticated(token, user));
    }

    fn navigator(&self) -> std::cell::RefMut<'_, Navigator> {
        std::cell::RefMut::map(self.navigator.borrow_mut(), |navigator| {
            navigator.as_mut().expect("a page was opened")
        })
    }
}

#[fixture]
fn world() -> RouteWorld {
    RouteWorld {
        sessions: watch::Sender::new(Session::initializing()),
        navigator: RefCell::new(None),
    }
}

#[given("a signed-out visitor")]
fn a_signed_out_visitor(world: &RouteWorld) {
    world.sessions.send_replace(Session::unauthenticated());
}

#[given("an approved barangay user")]
fn an_approved_barangay_user(world: &RouteWorld) {
    world.sign_in(barangay_user("captain@example.ph", ApprovalStatus::Approved));
}

#[given("a pending barangay user")]
fn a_pending_barangay_user(world: &RouteWorld) {
    world.sign_in(barangay_user("new@example.ph", ApprovalStatus::Pending));
}

#[given("a municipal admin")]
fn a_municipal_admin(world: &RouteWorld) {
    world.sign_in(admin_user("admin@example.ph"));
}

#[given("a session that is still initializing")]
fn a_session_that_is_still_initializing(world: &RouteWorld) {
    world.sessions.send_replace(Session::initializing());
}

#[when("they open \"{path}\"")]
fn they_open(world: &RouteWorld, path: String) {
    let navigator = Navigator::new(RouteTable::portal(), world.sessions.subscribe(), &path);
    *world.navigator.borrow_mut() = Some(navigator);
}

#[when("the session signs out")]
fn the_session_signs_out(world: &RouteWorld) {
    world.sessions.send_replace(Session::unauthenticated());
    world.navigator().sync();
}

#[then("they end up on \"{path}\"")]
fn they_end_up_on(world: &RouteWorld, path: String) {
    assert_eq!(world.navigator().path(), path);
}

#[then("the page renders")]
fn the_page_renders(world: &RouteWorld) {
    assert_eq!(world.navigator().state(), GuardState::Rendering);
}

#[then("the page is pending")]
fn the_page_is_pending(world: &RouteWorld) {
    assert_eq!(world.navigator().state(), GuardState::Pending);
}

#[then("the not-found link points to \"{target}\"")]
fn the_not_found_link_points_to(world: &RouteWorld, target: String) {
    assert_eq!(world.navigator().call_to_action(), Some(target.as_str()));
}

#[scenario(
    path = "tests/features/route_guard.feature",
    name = "A signed-out visitor is sent to the login page"
)]
fn a_signed_out_visitor_is_sent_to_the_login_page(world: RouteWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/route_guard.feature",
    name = "A barangay user cannot open admin pages"
)]
fn a_barangay_user_cannot_open_admin_pages(world: RouteWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/route_guard.feature",
    name = "A signed-in user skips the registration page"
)]
fn a_signed_in_user_skips_the_registration_page(world: RouteWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/route_guard.feature",
    name = "A pending barangay user cannot report incidents"
)]
fn a_pending_barangay_user_cannot_report_incidents(world: RouteWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/route_guard.feature",
    name = "An admin opens admin pages"
)]
fn an_admin_opens_admin_pages(world: RouteWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/route_guard.feature",
    name = "An unknown page always renders"
)]
fn an_unknown_page_always_renders(world: RouteWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/route_guard.feature",
    name = "Guards wait while the session initializes"
)]
fn guards_wait_while_the_session_initializes(world: RouteWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/route_guard.feature",
    name = "Signing out redirects away from protected pages"
)]
fn signing_out_redirects_away_from_protected_pages(world: RouteWorld) {
    drop(world);
}
