//! Booking session - the explicit context of one visitor's confirmation flow
//!
//! Owns the [`ConfirmationFlow`], the countdown timer, the delivery channel
//! and the persistence shim. User operations and timer callbacks take the
//! same async lock, so they are applied one at a time; a send in progress
//! delays a concurrent expiry instead of racing it.
//!
//! # Events
//!
//! State changes are published as [`FlowEvent`]s on a broadcast channel
//! (see [`BookingSession::subscribe`]). Operations also return their result
//! directly; errors convert into [`AppError`] / [`Notification`].

use std::sync::{Arc, Weak};
use std::time::Duration;

use legends_sms::template::{confirmation_code_message, confirmed_message};
use legends_sms::{Branding, SmsChannel, SmsError, format_phone_display, mask_phone};
use shared::error::{AppError, ErrorCode};
use shared::models::{Contact, Draft, DraftKind, Selection};
use shared::notification::Notification;
use shared::sms::{SmsRecord, SmsRequest, SmsStatus};
use shared::util::now_millis;
use tokio::sync::{Mutex, broadcast};

use super::config::EngineConfig;
use crate::confirmation::{
    CodeSource, ConfirmationFlow, CountdownTimer, Dispatch, DispatchKind, FlowError, FlowEvent,
    FlowPhase, FlowResult, FlowSettings, RandomCodeSource, RestoreOutcome,
};
use crate::storage::DraftStorage;
use crate::utils::time::{ceil_secs, format_countdown, minutes_label};
use crate::wizard::BookingWizard;

/// Event broadcast channel capacity (1 tick/s, slow subscribers lag, not block)
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Cheap-to-clone handle to one visitor's session
#[derive(Clone)]
pub struct BookingSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    /// Unique per session, for log correlation
    session_id: String,
    state: Mutex<SessionState>,
    channel: Arc<dyn SmsChannel>,
    storage: DraftStorage,
    event_tx: broadcast::Sender<FlowEvent>,
    branding: Branding,
}

struct SessionState {
    flow: ConfirmationFlow,
    codes: Box<dyn CodeSource>,
    timer: Option<CountdownTimer>,
    /// Bumped on every timer (re)arm; expiries from older timers are ignored
    generation: u64,
}

impl std::fmt::Debug for BookingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingSession")
            .field("session_id", &self.inner.session_id)
            .field("channel", &self.inner.channel.provider())
            .finish_non_exhaustive()
    }
}

impl BookingSession {
    /// Create a session with random confirmation codes
    pub fn new(
        channel: Arc<dyn SmsChannel>,
        storage: DraftStorage,
        settings: FlowSettings,
        branding: Branding,
    ) -> Self {
        Self::with_code_source(
            channel,
            storage,
            settings,
            branding,
            Box::new(RandomCodeSource::new()),
        )
    }

    /// Create a session drawing codes from `codes`
    pub fn with_code_source(
        channel: Arc<dyn SmsChannel>,
        storage: DraftStorage,
        settings: FlowSettings,
        branding: Branding,
        codes: Box<dyn CodeSource>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let session_id = uuid::Uuid::new_v4().to_string();
        tracing::info!(session_id = %session_id, provider = channel.provider(), "Booking session created");

        Self {
            inner: Arc::new(SessionInner {
                session_id,
                state: Mutex::new(SessionState {
                    flow: ConfirmationFlow::new(settings),
                    codes,
                    timer: None,
                    generation: 0,
                }),
                channel,
                storage,
                event_tx,
                branding,
            }),
        }
    }

    /// Open storage and channel from config, then restore the saved draft
    pub async fn open(config: &EngineConfig) -> FlowResult<Self> {
        let storage = DraftStorage::open(config.db_path())?;
        let channel = config
            .build_channel()
            .map_err(|e| FlowError::Config(e.to_string()))?;

        let session = Self::new(channel, storage, config.flow_settings(), config.branding());
        session.restore().await?;
        Ok(session)
    }

    pub fn session_id(&self) -> &str {
        &self.inner.session_id
    }

    /// Subscribe to view-model events
    pub fn subscribe(&self) -> broadcast::Receiver<FlowEvent> {
        self.inner.event_tx.subscribe()
    }

    pub fn storage(&self) -> &DraftStorage {
        &self.inner.storage
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub async fn phase(&self) -> FlowPhase {
        self.inner.state.lock().await.flow.phase()
    }

    pub async fn current(&self) -> Option<Draft> {
        self.inner.state.lock().await.flow.draft().cloned()
    }

    pub async fn resends_left(&self) -> u32 {
        self.inner.state.lock().await.flow.resends_left()
    }

    /// Whole seconds left on the countdown, if one is running
    pub async fn remaining_secs(&self) -> Option<u64> {
        let state = self.inner.state.lock().await;
        if state.flow.phase() != FlowPhase::PendingConfirmation {
            return None;
        }
        state.timer.as_ref().map(|t| ceil_secs(t.remaining()))
    }

    /// Confirmed drafts whose window has not yet passed
    pub fn active_confirmed(&self) -> FlowResult<Vec<Draft>> {
        let active = self.inner.storage.active_confirmed(now_millis())?;
        if !active.is_empty() {
            tracing::info!(count = active.len(), "Found active confirmed drafts");
        }
        Ok(active)
    }

    pub fn history(&self) -> FlowResult<Vec<Draft>> {
        Ok(self.inner.storage.list_history()?)
    }

    pub fn sms_history(&self) -> FlowResult<Vec<SmsRecord>> {
        Ok(self.inner.storage.sms_history()?)
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Validate the form, send a code and start the countdown
    pub async fn submit(&self, contact: Contact, selection: Selection) -> FlowResult<Draft> {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;

        let dispatch = state
            .flow
            .submit(contact, selection, now_millis(), state.codes.as_mut())?;

        match self.deliver(&dispatch).await {
            Ok(()) => {
                let draft = state
                    .flow
                    .delivery_succeeded(DispatchKind::Initial, now_millis())?
                    .clone();
                self.code_delivered(state, &draft, dispatch.ttl_secs, false);
                Ok(draft)
            }
            Err(e) => {
                state.flow.delivery_failed(DispatchKind::Initial, now_millis());
                Err(self.delivery_failed(&dispatch.draft, e))
            }
        }
    }

    /// Submit a booking wizard that reached its confirm step
    pub async fn submit_wizard(&self, wizard: &BookingWizard) -> FlowResult<Draft> {
        let (contact, selection) = wizard.submission().map_err(|e| {
            if e.code == ErrorCode::InvalidState {
                FlowError::InvalidState(e.message)
            } else {
                FlowError::Validation(e)
            }
        })?;
        self.submit(contact, selection).await
    }

    /// Check the entered code
    pub async fn verify(&self, input: &str) -> FlowResult<Draft> {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        let before = state.flow.phase();

        let result = state.flow.verify(input, now_millis()).map(Draft::clone);
        let draft = match result {
            Ok(draft) => draft,
            Err(err) => {
                match &err {
                    FlowError::Expired(_) if before == FlowPhase::PendingConfirmation => {
                        self.expired_locked(state);
                    }
                    FlowError::CodeMismatch => {
                        if let Some(draft) = state.flow.draft() {
                            crate::analytics_event!(
                                "confirmation_failed",
                                draft_id = %draft.id,
                                resend_count = draft.resend_count
                            );
                        }
                    }
                    _ => {}
                }
                return Err(err);
            }
        };

        Self::stop_timer(state);
        self.persist(&draft);
        tracing::info!(session_id = %self.inner.session_id, draft_id = %draft.id, "Draft confirmed");
        match draft.kind() {
            DraftKind::Booking => crate::analytics_event!(
                "booking_completed",
                draft_id = %draft.id,
                party_size = draft.party_size().unwrap_or_default()
            ),
            DraftKind::Order => crate::analytics_event!("order_confirmed", draft_id = %draft.id),
        }
        self.publish(FlowEvent::Confirmed {
            draft: draft.clone(),
            notification: Notification::success(format!(
                "Your {} {} is confirmed!",
                draft.kind().label(),
                draft.id
            )),
        });
        drop(guard);

        self.send_confirmed_message(&draft).await;
        Ok(draft)
    }

    /// Send a new code; bounded by the resend limit
    pub async fn resend(&self) -> FlowResult<Draft> {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        let before = state.flow.phase();

        let dispatch = match state.flow.resend(now_millis(), state.codes.as_mut()) {
            Ok(dispatch) => dispatch,
            Err(err) => {
                if matches!(err, FlowError::Expired(_)) && before == FlowPhase::PendingConfirmation
                {
                    self.expired_locked(state);
                }
                return Err(err);
            }
        };

        match self.deliver(&dispatch).await {
            Ok(()) => {
                let draft = state
                    .flow
                    .delivery_succeeded(DispatchKind::Resend, now_millis())?
                    .clone();
                self.code_delivered(state, &draft, dispatch.ttl_secs, true);
                Ok(draft)
            }
            Err(e) => {
                state.flow.delivery_failed(DispatchKind::Resend, now_millis());
                // 新码已生效，保留原有时限
                if let Some(draft) = state.flow.draft() {
                    self.persist(draft);
                }
                Err(self.delivery_failed(&dispatch.draft, e))
            }
        }
    }

    /// Abandon the pending draft
    pub async fn cancel(&self) -> FlowResult<Draft> {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;

        let draft = state.flow.cancel(now_millis())?.clone();
        Self::stop_timer(state);
        self.persist(&draft);
        tracing::info!(session_id = %self.inner.session_id, draft_id = %draft.id, "Draft cancelled");
        self.publish_cancelled(&draft.id);
        Ok(draft)
    }

    /// Cancel an already confirmed draft, from this session or the history.
    ///
    /// Returns `false` when no confirmed draft has this id.
    pub async fn cancel_by_id(&self, draft_id: &str) -> FlowResult<bool> {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        let now = now_millis();

        let cancelled = if state.flow.cancel_confirmed(draft_id, now) {
            if let Some(draft) = state.flow.draft() {
                self.persist(draft);
            }
            true
        } else {
            self.inner.storage.cancel_confirmed(draft_id, now)?
        };

        if cancelled {
            tracing::info!(session_id = %self.inner.session_id, draft_id = %draft_id, "Confirmed draft cancelled");
            self.publish_cancelled(draft_id);
        } else {
            tracing::debug!(draft_id = %draft_id, "No confirmed draft to cancel");
        }
        Ok(cancelled)
    }

    /// Start over with an empty form. Returns the dropped draft.
    pub async fn reset(&self) -> Option<Draft> {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;

        Self::stop_timer(state);
        state.generation += 1;
        let old = state.flow.reset();

        if let Err(e) = self.inner.storage.clear_current() {
            tracing::error!(error = %e, "Failed to clear current draft");
        }
        tracing::info!(
            session_id = %self.inner.session_id,
            draft_id = old.as_ref().map(|d| d.id.as_str()).unwrap_or("-"),
            "Session reset"
        );
        self.publish(FlowEvent::Reset);
        old
    }

    /// Pick up the draft saved by a previous session.
    ///
    /// A pending draft still inside its window resumes with the countdown
    /// re-armed; one whose window elapsed is marked expired.
    pub async fn restore(&self) -> FlowResult<Option<RestoreOutcome>> {
        let Some(saved) = self.inner.storage.load_current()? else {
            return Ok(None);
        };

        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        let draft_id = saved.id.clone();
        let outcome = state.flow.restore(saved, now_millis())?;

        match outcome {
            RestoreOutcome::Resumed { remaining_millis } => {
                let remaining = Duration::from_millis(remaining_millis.max(0) as u64);
                self.arm_timer(state, &draft_id, remaining);
            }
            RestoreOutcome::ExpiredWhileAway => {
                if let Some(draft) = state.flow.draft().cloned() {
                    self.persist(&draft);
                    self.publish_expired(&draft);
                }
            }
            RestoreOutcome::Finished(_) | RestoreOutcome::Collecting => {}
        }

        tracing::info!(
            session_id = %self.inner.session_id,
            draft_id = %draft_id,
            outcome = ?outcome,
            "Draft restored"
        );
        Ok(Some(outcome))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Send the staged code and record it in the SMS history
    async fn deliver(&self, dispatch: &Dispatch) -> Result<(), SmsError> {
        let draft = &dispatch.draft;
        let message = confirmation_code_message(
            &self.inner.branding,
            draft,
            dispatch.code.as_str(),
            minutes_label(dispatch.ttl_secs),
        );
        let request = SmsRequest::new(draft.contact.phone.clone(), message);

        tracing::info!(
            session_id = %self.inner.session_id,
            draft_id = %draft.id,
            to = %mask_phone(&request.to),
            resend = dispatch.kind == DispatchKind::Resend,
            "Sending confirmation code"
        );
        self.send_and_record(&request).await
    }

    async fn send_and_record(&self, request: &SmsRequest) -> Result<(), SmsError> {
        let result = self.inner.channel.send(request).await;

        let record = SmsRecord {
            to: request.to.clone(),
            message: request.message.clone(),
            timestamp: now_millis(),
            status: if result.is_ok() {
                SmsStatus::Sent
            } else {
                SmsStatus::Failed
            },
            message_id: result.as_ref().ok().map(|r| r.message_id.clone()),
            error: result.as_ref().err().map(|e| e.to_string()),
        };
        if let Err(e) = self.inner.storage.append_sms(&record) {
            tracing::error!(error = %e, "Failed to record SMS history");
        }

        result.map(|_| ())
    }

    /// Post-delivery bookkeeping shared by submit and resend
    fn code_delivered(&self, state: &mut SessionState, draft: &Draft, ttl_secs: i64, resent: bool) {
        self.persist(draft);

        crate::analytics_event!(
            "confirmation_sent",
            draft_id = %draft.id,
            kind = draft.kind().label(),
            phone = %mask_phone(&draft.contact.phone),
            resent = resent
        );
        self.publish(FlowEvent::CodeSent {
            draft_id: draft.id.clone(),
            phone_display: format_phone_display(&draft.contact.phone),
            expires_at: draft.expires_at.unwrap_or_default(),
            resends_left: state.flow.resends_left(),
            resent,
        });

        self.arm_timer(state, &draft.id, Duration::from_secs(ttl_secs.max(0) as u64));
    }

    fn delivery_failed(&self, draft: &Draft, err: SmsError) -> FlowError {
        tracing::warn!(
            session_id = %self.inner.session_id,
            draft_id = %draft.id,
            error = %err,
            "Failed to send confirmation code"
        );
        let flow_err = FlowError::DeliveryFailed(err);
        let app = AppError::from(&flow_err);
        self.publish(FlowEvent::DeliveryFailed {
            draft_id: draft.id.clone(),
            notification: Notification::from(&app),
        });
        flow_err
    }

    /// (Re)start the countdown for `draft_id`, replacing any running timer
    fn arm_timer(&self, state: &mut SessionState, draft_id: &str, remaining: Duration) {
        Self::stop_timer(state);
        state.generation += 1;
        let generation = state.generation;

        let secs = ceil_secs(remaining);
        self.publish(FlowEvent::CountdownTick {
            draft_id: draft_id.to_string(),
            remaining_secs: secs,
            display: format_countdown(secs),
        });

        let tx = self.inner.event_tx.clone();
        let tick_id = draft_id.to_string();
        let weak: Weak<SessionInner> = Arc::downgrade(&self.inner);

        state.timer = Some(CountdownTimer::start(
            generation,
            remaining,
            move |left| {
                let secs = ceil_secs(left);
                let _ = tx.send(FlowEvent::CountdownTick {
                    draft_id: tick_id.clone(),
                    remaining_secs: secs,
                    display: format_countdown(secs),
                });
            },
            move || async move {
                if let Some(inner) = weak.upgrade() {
                    BookingSession { inner }.on_timer_expired(generation).await;
                }
            },
        ));
    }

    fn stop_timer(state: &mut SessionState) {
        if let Some(timer) = state.timer.take() {
            timer.cancel();
        }
    }

    async fn on_timer_expired(&self, generation: u64) {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;

        if state.generation != generation {
            tracing::debug!(generation, current = state.generation, "Ignoring stale expiry");
            return;
        }
        if !state.flow.expire(now_millis()) {
            return;
        }
        self.expired_locked(state);
    }

    /// Bookkeeping after the flow moved to `expired`
    fn expired_locked(&self, state: &mut SessionState) {
        Self::stop_timer(state);
        if let Some(draft) = state.flow.draft().cloned() {
            tracing::info!(session_id = %self.inner.session_id, draft_id = %draft.id, "Confirmation window elapsed");
            self.persist(&draft);
            self.publish_expired(&draft);
        }
    }

    fn publish_expired(&self, draft: &Draft) {
        let app = AppError::new(ErrorCode::CodeExpired).with_detail("draft_id", draft.id.as_str());
        self.publish(FlowEvent::Expired {
            draft_id: draft.id.clone(),
            notification: Notification::from(&app),
        });
    }

    fn publish_cancelled(&self, draft_id: &str) {
        self.publish(FlowEvent::Cancelled {
            draft_id: draft_id.to_string(),
            notification: Notification::info(format!("{} has been cancelled", draft_id)),
        });
    }

    /// Follow-up message after confirmation; failures are only logged
    async fn send_confirmed_message(&self, draft: &Draft) {
        let request = SmsRequest::new(
            draft.contact.phone.clone(),
            confirmed_message(&self.inner.branding, draft),
        );
        if let Err(e) = self.send_and_record(&request).await {
            tracing::warn!(draft_id = %draft.id, error = %e, "Failed to send confirmed message");
        }
    }

    /// Storage is not authoritative: failures never undo a transition
    fn persist(&self, draft: &Draft) {
        if let Err(e) = self.inner.storage.save_current(draft) {
            tracing::error!(
                session_id = %self.inner.session_id,
                draft_id = %draft.id,
                error = %e,
                "Failed to persist draft"
            );
        }
    }

    fn publish(&self, event: FlowEvent) {
        tracing::trace!(event = event.name(), "Publishing flow event");
        let _ = self.inner.event_tx.send(event);
    }
}
