use std::time::Duration;

pub(crate) const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub(crate) const TICK_RATE: Duration = Duration::from_millis(200);

pub(crate) const STATUS_REFRESHED: &str = "Refreshed tasks";
pub(crate) const STATUS_ENTER_ADD: &str =
    "New task — Tab/↓ next field • Space cycles category • Enter save • Esc cancel";
pub(crate) const STATUS_ENTER_EDIT: &str =
    "Edit task — Tab/↓ next field • Space cycles category • Enter save • Esc cancel";
pub(crate) const STATUS_VIEW_DETAILS: &str = "Viewing task details • Enter/Esc to close";
pub(crate) const STATUS_HELP: &str = "Keyboard reference — Enter/Esc to close";
pub(crate) const STATUS_CONFIRM_DELETE: &str =
    "Confirm deletion — arrows choose, Enter confirms, Esc cancels";
pub(crate) const STATUS_SESSION_EXPIRED: &str =
    "Session expired — run `daydash login <email>` and relaunch";
