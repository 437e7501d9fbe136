//! 确认流程状态机
//!
//! ```text
//! collecting ──submit+delivered──► pending_confirmation ──verify──► confirmed
//!                                        │  ▲
//!                                        │  └── resend (≤ max_resends)
//!                                        ├──cancel──► cancelled
//!                                        └──timer───► expired
//! ```
//!
//! Pure and synchronous: callers pass `now` (Unix millis) and a
//! [`CodeSource`]; delivery happens outside, between [`ConfirmationFlow::submit`]
//! / [`ConfirmationFlow::resend`] and the matching `delivery_*` call.

use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{ConfirmationCode, Contact, Draft, DraftKind, DraftStatus, Selection};

use super::code::CodeSource;
use super::error::{FlowError, FlowResult};
use crate::utils::validation::validate_draft_input;

/// Shortest allowed confirmation window
pub const MIN_TTL_SECS: i64 = 5 * 60;
/// Longest allowed confirmation window
pub const MAX_TTL_SECS: i64 = 15 * 60;
pub const DEFAULT_BOOKING_TTL_SECS: i64 = 300;
pub const DEFAULT_ORDER_TTL_SECS: i64 = 900;
pub const DEFAULT_MAX_RESENDS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowPhase {
    Collecting,
    PendingConfirmation,
    Confirmed,
    Cancelled,
    Expired,
}

impl FlowPhase {
    pub fn name(&self) -> &'static str {
        match self {
            FlowPhase::Collecting => "collecting",
            FlowPhase::PendingConfirmation => "pending_confirmation",
            FlowPhase::Confirmed => "confirmed",
            FlowPhase::Cancelled => "cancelled",
            FlowPhase::Expired => "expired",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FlowPhase::Confirmed | FlowPhase::Cancelled | FlowPhase::Expired
        )
    }
}

/// Windows and limits of the flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowSettings {
    pub booking_ttl_secs: i64,
    pub order_ttl_secs: i64,
    pub max_resends: u32,
}

impl FlowSettings {
    /// Windows are clamped to 5-15 minutes
    pub fn new(booking_ttl_secs: i64, order_ttl_secs: i64, max_resends: u32) -> Self {
        Self {
            booking_ttl_secs: booking_ttl_secs.clamp(MIN_TTL_SECS, MAX_TTL_SECS),
            order_ttl_secs: order_ttl_secs.clamp(MIN_TTL_SECS, MAX_TTL_SECS),
            max_resends,
        }
    }

    pub fn ttl_secs(&self, kind: DraftKind) -> i64 {
        match kind {
            DraftKind::Booking => self.booking_ttl_secs,
            DraftKind::Order => self.order_ttl_secs,
        }
    }
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self::new(
            DEFAULT_BOOKING_TTL_SECS,
            DEFAULT_ORDER_TTL_SECS,
            DEFAULT_MAX_RESENDS,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchKind {
    Initial,
    Resend,
}

/// A code that must now be delivered to the customer
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub kind: DispatchKind,
    pub draft: Draft,
    pub code: ConfirmationCode,
    pub ttl_secs: i64,
}

/// What [`ConfirmationFlow::restore`] made of a persisted draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Still inside its window; the timer must be re-armed
    Resumed { remaining_millis: i64 },
    /// Window elapsed while nobody was watching
    ExpiredWhileAway,
    /// Already confirmed, cancelled or expired
    Finished(FlowPhase),
    /// Never reached the customer; kept as form data
    Collecting,
}

/// Single-draft confirmation state machine
#[derive(Debug, Clone)]
pub struct ConfirmationFlow {
    settings: FlowSettings,
    phase: FlowPhase,
    draft: Option<Draft>,
}

impl ConfirmationFlow {
    pub fn new(settings: FlowSettings) -> Self {
        Self {
            settings,
            phase: FlowPhase::Collecting,
            draft: None,
        }
    }

    pub fn phase(&self) -> FlowPhase {
        self.phase
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn settings(&self) -> &FlowSettings {
        &self.settings
    }

    /// Resends still allowed for the current draft
    pub fn resends_left(&self) -> u32 {
        let used = self.draft.as_ref().map_or(0, |d| d.resend_count);
        self.settings.max_resends.saturating_sub(used)
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Validate the form and stage a new draft with a fresh code.
    ///
    /// The phase stays `Collecting` until [`Self::delivery_succeeded`].
    pub fn submit(
        &mut self,
        contact: Contact,
        selection: Selection,
        now: i64,
        codes: &mut dyn CodeSource,
    ) -> FlowResult<Dispatch> {
        match self.phase {
            FlowPhase::Collecting => {}
            FlowPhase::PendingConfirmation => {
                return Err(FlowError::DraftAlreadyPending(self.draft_id()));
            }
            phase => {
                return Err(FlowError::InvalidState(format!(
                    "draft is {}; start a new one first",
                    phase.name()
                )));
            }
        }

        validate_draft_input(&contact, &selection)?;

        let mut draft = Draft::new(contact, selection, now);
        let code = codes.next_code();
        draft.confirmation_code = Some(code.clone());
        let ttl_secs = self.settings.ttl_secs(draft.kind());

        self.draft = Some(draft.clone());
        Ok(Dispatch {
            kind: DispatchKind::Initial,
            draft,
            code,
            ttl_secs,
        })
    }

    /// The staged code reached the customer: (re)start the window
    pub fn delivery_succeeded(&mut self, kind: DispatchKind, now: i64) -> FlowResult<&Draft> {
        let expected = match kind {
            DispatchKind::Initial => FlowPhase::Collecting,
            DispatchKind::Resend => FlowPhase::PendingConfirmation,
        };
        if self.phase != expected {
            return Err(self.wrong_phase("complete delivery"));
        }

        let ttl_millis = self.settings.ttl_secs(self.current_kind()?) * 1000;
        let draft = self.draft_mut()?;
        if draft.confirmation_code.is_none() {
            return Err(FlowError::InvalidState("no code staged for delivery".into()));
        }
        draft.expires_at = Some(now + ttl_millis);
        draft.updated_at = now;

        self.phase = FlowPhase::PendingConfirmation;
        self.draft_ref()
    }

    /// The staged code could not be delivered.
    ///
    /// A first send drops the code and keeps the form data; a failed resend
    /// keeps the new code and the previous window.
    pub fn delivery_failed(&mut self, kind: DispatchKind, now: i64) {
        if kind == DispatchKind::Initial
            && self.phase == FlowPhase::Collecting
            && let Some(draft) = self.draft.as_mut()
        {
            draft.confirmation_code = None;
            draft.updated_at = now;
        }
    }

    /// Compare the entered code with the current one
    pub fn verify(&mut self, input: &str, now: i64) -> FlowResult<&Draft> {
        if self.phase == FlowPhase::Expired {
            return Err(FlowError::Expired(self.draft_id()));
        }
        if self.phase != FlowPhase::PendingConfirmation {
            return Err(self.wrong_phase("verify"));
        }

        let entered = ConfirmationCode::parse(input)
            .ok_or_else(|| AppError::field_invalid(ErrorCode::InvalidCodeFormat, "code"))?;

        if self.expire_if_due(now) {
            return Err(FlowError::Expired(self.draft_id()));
        }

        let draft = self.draft_mut()?;
        if draft.confirmation_code.as_ref() != Some(&entered) {
            return Err(FlowError::CodeMismatch);
        }

        draft.status = DraftStatus::Confirmed;
        draft.confirmed_at = Some(now);
        draft.updated_at = now;
        self.phase = FlowPhase::Confirmed;
        self.draft_ref()
    }

    /// Replace the code, counting against the resend limit
    pub fn resend(&mut self, now: i64, codes: &mut dyn CodeSource) -> FlowResult<Dispatch> {
        if self.phase == FlowPhase::Expired {
            return Err(FlowError::Expired(self.draft_id()));
        }
        if self.phase != FlowPhase::PendingConfirmation {
            return Err(self.wrong_phase("resend"));
        }
        if self.expire_if_due(now) {
            return Err(FlowError::Expired(self.draft_id()));
        }

        let max = self.settings.max_resends;
        let ttl_secs = self.settings.ttl_secs(self.current_kind()?);
        let draft = self.draft_mut()?;
        if draft.resend_count >= max {
            return Err(FlowError::RetryLimitExceeded(max));
        }

        // 新验证码立即生效，旧码作废
        let code = codes.next_code();
        draft.resend_count += 1;
        draft.confirmation_code = Some(code.clone());
        draft.updated_at = now;

        Ok(Dispatch {
            kind: DispatchKind::Resend,
            draft: draft.clone(),
            code,
            ttl_secs,
        })
    }

    pub fn cancel(&mut self, now: i64) -> FlowResult<&Draft> {
        if self.phase != FlowPhase::PendingConfirmation {
            return Err(self.wrong_phase("cancel"));
        }
        let draft = self.draft_mut()?;
        draft.status = DraftStatus::Cancelled;
        draft.cancelled_at = Some(now);
        draft.confirmation_code = None;
        draft.updated_at = now;
        self.phase = FlowPhase::Cancelled;
        self.draft_ref()
    }

    /// Withdraw the confirmed draft `draft_id` held by this flow.
    ///
    /// Returns `false` when the flow holds no confirmed draft with that id.
    pub fn cancel_confirmed(&mut self, draft_id: &str, now: i64) -> bool {
        if self.phase != FlowPhase::Confirmed {
            return false;
        }
        let Some(draft) = self.draft.as_mut().filter(|d| d.id == draft_id) else {
            return false;
        };
        draft.status = DraftStatus::Cancelled;
        draft.cancelled_at = Some(now);
        draft.updated_at = now;
        self.phase = FlowPhase::Cancelled;
        true
    }

    /// Timer ran out. Returns `false` when nothing was pending.
    pub fn expire(&mut self, now: i64) -> bool {
        if self.phase != FlowPhase::PendingConfirmation {
            return false;
        }
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        draft.status = DraftStatus::Expired;
        draft.expired_at = Some(now);
        draft.confirmation_code = None;
        draft.updated_at = now;
        self.phase = FlowPhase::Expired;
        true
    }

    /// Expire the pending draft if its deadline has passed at `now`
    pub fn expire_if_due(&mut self, now: i64) -> bool {
        let due = self.phase == FlowPhase::PendingConfirmation
            && self.draft.as_ref().is_some_and(|d| d.is_past_expiry(now));
        due && self.expire(now)
    }

    /// Drop the draft and go back to an empty form
    pub fn reset(&mut self) -> Option<Draft> {
        self.phase = FlowPhase::Collecting;
        self.draft.take()
    }

    /// Adopt a persisted draft after a reload
    pub fn restore(&mut self, mut draft: Draft, now: i64) -> FlowResult<RestoreOutcome> {
        if self.phase != FlowPhase::Collecting || self.draft.is_some() {
            return Err(self.wrong_phase("restore"));
        }

        let outcome = match draft.status {
            DraftStatus::Pending
                if draft.confirmation_code.is_some() && draft.expires_at.is_some() =>
            {
                self.phase = FlowPhase::PendingConfirmation;
                let remaining_millis = draft.remaining_millis(now).unwrap_or(0);
                self.draft = Some(draft);
                if self.expire_if_due(now) {
                    return Ok(RestoreOutcome::ExpiredWhileAway);
                }
                return Ok(RestoreOutcome::Resumed { remaining_millis });
            }
            DraftStatus::Pending => {
                draft.confirmation_code = None;
                RestoreOutcome::Collecting
            }
            DraftStatus::Confirmed => {
                self.phase = FlowPhase::Confirmed;
                RestoreOutcome::Finished(FlowPhase::Confirmed)
            }
            DraftStatus::Cancelled => {
                self.phase = FlowPhase::Cancelled;
                RestoreOutcome::Finished(FlowPhase::Cancelled)
            }
            DraftStatus::Expired => {
                self.phase = FlowPhase::Expired;
                RestoreOutcome::Finished(FlowPhase::Expired)
            }
        };
        self.draft = Some(draft);
        Ok(outcome)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn draft_id(&self) -> String {
        self.draft.as_ref().map(|d| d.id.clone()).unwrap_or_default()
    }

    fn current_kind(&self) -> FlowResult<DraftKind> {
        self.draft_ref().map(Draft::kind)
    }

    fn draft_ref(&self) -> FlowResult<&Draft> {
        self.draft
            .as_ref()
            .ok_or_else(|| FlowError::InvalidState("no draft".into()))
    }

    fn draft_mut(&mut self) -> FlowResult<&mut Draft> {
        self.draft
            .as_mut()
            .ok_or_else(|| FlowError::InvalidState("no draft".into()))
    }

    fn wrong_phase(&self, op: &str) -> FlowError {
        FlowError::InvalidState(format!("cannot {} while {}", op, self.phase.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirmation::code::ScriptedCodes;
    use chrono::{NaiveDate, NaiveTime};
    use shared::models::{BookingSelection, OrderItem, OrderSelection, OrderType, TableRef};

    const NOW: i64 = 1_760_000_483_920;

    fn contact() -> Contact {
        Contact::new("Thandi", "082 123 4567").with_email("thandi@example.com")
    }

    fn booking() -> Selection {
        Selection::Booking(BookingSelection {
            date: NaiveDate::from_ymd_opt(2026, 10, 24).unwrap(),
            time: NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
            table: TableRef::new(2, "Rooftop", 4),
            party_size: 4,
        })
    }

    fn codes() -> ScriptedCodes {
        ScriptedCodes::from_strs(&["483920", "222222", "333333", "444444", "555555"]).unwrap()
    }

    /// Flow with a delivered booking draft, code 483920
    fn pending() -> (ConfirmationFlow, ScriptedCodes) {
        let mut flow = ConfirmationFlow::new(FlowSettings::default());
        let mut codes = codes();
        let dispatch = flow.submit(contact(), booking(), NOW, &mut codes).unwrap();
        assert_eq!(dispatch.kind, DispatchKind::Initial);
        flow.delivery_succeeded(DispatchKind::Initial, NOW).unwrap();
        (flow, codes)
    }

    #[test]
    fn test_submit_stages_code() {
        let mut flow = ConfirmationFlow::new(FlowSettings::default());
        let dispatch = flow.submit(contact(), booking(), NOW, &mut codes()).unwrap();

        assert_eq!(dispatch.code.as_str(), "483920");
        assert_eq!(dispatch.ttl_secs, 300);
        assert_eq!(dispatch.draft.id, "BK483920");
        assert_eq!(dispatch.draft.contact.phone, "0821234567");
        // Not pending until the code is delivered
        assert_eq!(flow.phase(), FlowPhase::Collecting);
        assert!(flow.draft().unwrap().expires_at.is_none());
    }

    #[test]
    fn test_submit_validation() {
        let mut flow = ConfirmationFlow::new(FlowSettings::default());
        let err = flow
            .submit(Contact::new("T", "0821234567"), booking(), NOW, &mut codes())
            .unwrap_err();
        let FlowError::Validation(app) = err else {
            panic!("expected validation error");
        };
        assert_eq!(app.code, ErrorCode::InvalidName);
        assert!(flow.draft().is_none());
    }

    #[test]
    fn test_delivery_starts_window() {
        let (flow, _) = pending();
        let draft = flow.draft().unwrap();
        assert_eq!(flow.phase(), FlowPhase::PendingConfirmation);
        assert_eq!(draft.expires_at, Some(NOW + 300_000));
        assert_eq!(draft.status, DraftStatus::Pending);
    }

    #[test]
    fn test_order_window_is_fifteen_minutes() {
        let mut flow = ConfirmationFlow::new(FlowSettings::default());
        let order = Selection::Order(OrderSelection {
            order_type: OrderType::Collection,
            items: vec![OrderItem::new("Braai Platter", 1)],
        });
        flow.submit(Contact::new("Sipho", "0731112222"), order, NOW, &mut codes())
            .unwrap();
        let draft = flow.delivery_succeeded(DispatchKind::Initial, NOW).unwrap();
        assert_eq!(draft.expires_at, Some(NOW + 900_000));
    }

    #[test]
    fn test_exact_code_confirms() {
        let (mut flow, _) = pending();
        let draft = flow.verify(" 483920 ", NOW + 60_000).unwrap();
        assert_eq!(draft.status, DraftStatus::Confirmed);
        assert_eq!(draft.confirmed_at, Some(NOW + 60_000));
        assert_eq!(flow.phase(), FlowPhase::Confirmed);
    }

    #[test]
    fn test_wrong_code_keeps_pending() {
        let (mut flow, _) = pending();
        let before = flow.draft().cloned();

        let err = flow.verify("000000", NOW + 1_000).unwrap_err();
        assert!(matches!(err, FlowError::CodeMismatch));
        assert_eq!(flow.phase(), FlowPhase::PendingConfirmation);
        assert_eq!(flow.draft().cloned(), before);

        // Retry in place
        assert!(flow.verify("483920", NOW + 2_000).is_ok());
    }

    #[test]
    fn test_malformed_code_is_validation_error() {
        let (mut flow, _) = pending();
        for input in ["", "48392", "4839201", "48392a"] {
            let err = flow.verify(input, NOW).unwrap_err();
            let FlowError::Validation(app) = err else {
                panic!("expected validation error for {input:?}");
            };
            assert_eq!(app.code, ErrorCode::InvalidCodeFormat);
            assert_eq!(app.field(), Some("code"));
        }
        assert_eq!(flow.phase(), FlowPhase::PendingConfirmation);
    }

    #[test]
    fn test_verify_after_deadline_expires() {
        let (mut flow, _) = pending();
        let err = flow.verify("483920", NOW + 300_000).unwrap_err();
        assert!(matches!(err, FlowError::Expired(ref id) if id == "BK483920"));
        assert_eq!(flow.phase(), FlowPhase::Expired);
        assert!(flow.draft().unwrap().confirmation_code.is_none());

        // Already expired; nothing left to expire
        assert!(!flow.expire(NOW + 301_000));
        assert!(matches!(flow.verify("483920", NOW), Err(FlowError::Expired(_))));
    }

    #[test]
    fn test_expire_fires_once() {
        let (mut flow, _) = pending();
        assert!(flow.expire(NOW + 300_000));
        assert!(!flow.expire(NOW + 301_000));
        let draft = flow.draft().unwrap();
        assert_eq!(draft.status, DraftStatus::Expired);
        assert_eq!(draft.expired_at, Some(NOW + 300_000));
    }

    #[test]
    fn test_resend_replaces_code_and_window() {
        let (mut flow, mut codes) = pending();
        let dispatch = flow.resend(NOW + 10_000, &mut codes).unwrap();
        assert_eq!(dispatch.kind, DispatchKind::Resend);
        assert_eq!(dispatch.code.as_str(), "222222");
        assert_eq!(flow.resends_left(), 2);

        // Old code is invalid immediately
        assert!(matches!(
            flow.verify("483920", NOW + 11_000),
            Err(FlowError::CodeMismatch)
        ));

        flow.delivery_succeeded(DispatchKind::Resend, NOW + 10_000).unwrap();
        assert_eq!(flow.draft().unwrap().expires_at, Some(NOW + 310_000));
        assert!(flow.verify("222222", NOW + 12_000).is_ok());
    }

    #[test]
    fn test_fourth_resend_is_rejected() {
        let (mut flow, mut codes) = pending();
        for i in 1..=3 {
            flow.resend(NOW + i, &mut codes).unwrap();
            flow.delivery_succeeded(DispatchKind::Resend, NOW + i).unwrap();
        }
        let err = flow.resend(NOW + 4, &mut codes).unwrap_err();
        assert!(matches!(err, FlowError::RetryLimitExceeded(3)));
        assert_eq!(flow.resends_left(), 0);
        // Current code still works
        assert!(flow.verify("444444", NOW + 5).is_ok());
    }

    #[test]
    fn test_failed_resend_keeps_old_window() {
        let (mut flow, mut codes) = pending();
        flow.resend(NOW + 60_000, &mut codes).unwrap();
        flow.delivery_failed(DispatchKind::Resend, NOW + 60_000);

        let draft = flow.draft().unwrap();
        assert_eq!(draft.expires_at, Some(NOW + 300_000));
        assert_eq!(draft.confirmation_code.as_ref().unwrap().as_str(), "222222");
        assert_eq!(flow.phase(), FlowPhase::PendingConfirmation);
    }

    #[test]
    fn test_failed_first_send_keeps_form() {
        let mut flow = ConfirmationFlow::new(FlowSettings::default());
        flow.submit(contact(), booking(), NOW, &mut codes()).unwrap();
        flow.delivery_failed(DispatchKind::Initial, NOW);

        assert_eq!(flow.phase(), FlowPhase::Collecting);
        let draft = flow.draft().unwrap();
        assert!(draft.confirmation_code.is_none());
        assert_eq!(draft.contact.name, "Thandi");

        // Submitting again is allowed
        assert!(flow.submit(contact(), booking(), NOW + 1, &mut codes()).is_ok());
    }

    #[test]
    fn test_single_pending_draft() {
        let (mut flow, mut codes) = pending();
        let err = flow.submit(contact(), booking(), NOW, &mut codes).unwrap_err();
        assert!(matches!(err, FlowError::DraftAlreadyPending(ref id) if id == "BK483920"));
    }

    #[test]
    fn test_cancel() {
        let (mut flow, mut codes) = pending();
        let draft = flow.cancel(NOW + 5).unwrap();
        assert_eq!(draft.status, DraftStatus::Cancelled);
        assert_eq!(flow.phase(), FlowPhase::Cancelled);

        assert!(matches!(flow.cancel(NOW), Err(FlowError::InvalidState(_))));
        assert!(matches!(flow.resend(NOW, &mut codes), Err(FlowError::InvalidState(_))));
        assert!(matches!(
            flow.submit(contact(), booking(), NOW, &mut codes),
            Err(FlowError::InvalidState(_))
        ));
    }

    #[test]
    fn test_cancel_confirmed() {
        let (mut flow, _) = pending();
        let id = flow.draft().unwrap().id.clone();
        // Pending drafts are cancelled through `cancel`
        assert!(!flow.cancel_confirmed(&id, NOW));

        flow.verify("483920", NOW).unwrap();
        assert!(!flow.cancel_confirmed("BK000000", NOW + 1));
        assert!(flow.cancel_confirmed(&id, NOW + 1));
        assert_eq!(flow.phase(), FlowPhase::Cancelled);
        let draft = flow.draft().unwrap();
        assert_eq!(draft.status, DraftStatus::Cancelled);
        assert_eq!(draft.cancelled_at, Some(NOW + 1));
        assert!(!flow.cancel_confirmed(&id, NOW + 2));
    }

    #[test]
    fn test_wrong_phase_operations() {
        let mut flow = ConfirmationFlow::new(FlowSettings::default());
        assert!(matches!(flow.verify("483920", NOW), Err(FlowError::InvalidState(_))));
        assert!(matches!(flow.resend(NOW, &mut codes()), Err(FlowError::InvalidState(_))));
        assert!(!flow.expire(NOW));
    }

    #[test]
    fn test_reset_returns_to_collecting() {
        let (mut flow, _) = pending();
        flow.verify("483920", NOW).unwrap();
        let old = flow.reset().unwrap();
        assert_eq!(old.status, DraftStatus::Confirmed);
        assert_eq!(flow.phase(), FlowPhase::Collecting);
        assert!(flow.draft().is_none());
    }

    #[test]
    fn test_restore() {
        let (flow, _) = pending();
        let saved = flow.draft().cloned().unwrap();

        let mut resumed = ConfirmationFlow::new(FlowSettings::default());
        let outcome = resumed.restore(saved.clone(), NOW + 100_000).unwrap();
        assert_eq!(outcome, RestoreOutcome::Resumed { remaining_millis: 200_000 });
        assert_eq!(resumed.phase(), FlowPhase::PendingConfirmation);

        let mut late = ConfirmationFlow::new(FlowSettings::default());
        let outcome = late.restore(saved, NOW + 400_000).unwrap();
        assert_eq!(outcome, RestoreOutcome::ExpiredWhileAway);
        assert_eq!(late.draft().unwrap().status, DraftStatus::Expired);
        assert!(matches!(
            late.restore(flow.draft().cloned().unwrap(), NOW),
            Err(FlowError::InvalidState(_))
        ));
    }

    #[test]
    fn test_settings_clamp() {
        let s = FlowSettings::new(60, 3_600, 3);
        assert_eq!(s.booking_ttl_secs, MIN_TTL_SECS);
        assert_eq!(s.order_ttl_secs, MAX_TTL_SECS);
        assert_eq!(s.ttl_secs(DraftKind::Order), 900);
    }
}
