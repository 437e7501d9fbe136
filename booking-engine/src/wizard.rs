//! 四步订座向导
//!
//! `Schedule (date + time) → Table (table + party) → Contact → Confirm`
//!
//! Each step must be complete before moving on. Reaching `Confirm` hands
//! the collected data to [`BookingSession::submit_wizard`], which sends the
//! confirmation code.
//!
//! [`BookingSession::submit_wizard`]: crate::core::BookingSession::submit_wizard

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use shared::models::{
    BookingSelection, Contact, DEFAULT_PARTY_SIZE, DraftKind, MAX_PARTY_SIZE, MIN_PARTY_SIZE,
    Selection, TableRef,
};

use crate::catalog::BookingCatalog;
use crate::utils::validation::validate_contact;
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Schedule = 1,
    Table = 2,
    Contact = 3,
    Confirm = 4,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        *self as u8
    }

    fn next(self) -> Option<Self> {
        match self {
            WizardStep::Schedule => Some(WizardStep::Table),
            WizardStep::Table => Some(WizardStep::Contact),
            WizardStep::Contact => Some(WizardStep::Confirm),
            WizardStep::Confirm => None,
        }
    }

    fn prev(self) -> Option<Self> {
        match self {
            WizardStep::Schedule => None,
            WizardStep::Table => Some(WizardStep::Schedule),
            WizardStep::Contact => Some(WizardStep::Table),
            WizardStep::Confirm => Some(WizardStep::Contact),
        }
    }
}

/// Data collected so far
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookingForm {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub table: Option<TableRef>,
    pub party_size: u8,
    pub contact: Option<Contact>,
}

#[derive(Debug, Clone)]
pub struct BookingWizard {
    step: WizardStep,
    form: BookingForm,
    catalog: BookingCatalog,
}

impl BookingWizard {
    pub fn new(catalog: BookingCatalog) -> Self {
        Self {
            step: WizardStep::Schedule,
            form: BookingForm {
                party_size: DEFAULT_PARTY_SIZE,
                ..Default::default()
            },
            catalog,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn form(&self) -> &BookingForm {
        &self.form
    }

    pub fn catalog(&self) -> &BookingCatalog {
        &self.catalog
    }

    // ========== Step 1: schedule ==========

    pub fn select_date(&mut self, date: NaiveDate) -> AppResult<()> {
        self.catalog.check_date(date)?;
        self.form.date = Some(date);
        Ok(())
    }

    pub fn select_time(&mut self, time: NaiveTime) -> AppResult<()> {
        self.catalog.check_time(time)?;
        self.form.time = Some(time);
        Ok(())
    }

    // ========== Step 2: table ==========

    pub fn select_table(&mut self, table_id: &str) -> AppResult<&TableRef> {
        let table = self.catalog.table(table_id)?.clone();
        Ok(&*self.form.table.insert(table))
    }

    pub fn set_party_size(&mut self, size: u8) -> AppResult<()> {
        if !(MIN_PARTY_SIZE..=MAX_PARTY_SIZE).contains(&size) {
            return Err(AppError::field_invalid(ErrorCode::PartySizeOutOfRange, "party_size"));
        }
        self.form.party_size = size;
        Ok(())
    }

    /// `+` button; stops at the maximum
    pub fn increment_party(&mut self) -> u8 {
        if self.form.party_size < MAX_PARTY_SIZE {
            self.form.party_size += 1;
        }
        self.form.party_size
    }

    /// `-` button; stops at the minimum
    pub fn decrement_party(&mut self) -> u8 {
        if self.form.party_size > MIN_PARTY_SIZE {
            self.form.party_size -= 1;
        }
        self.form.party_size
    }

    // ========== Step 3: contact ==========

    /// Store the contact form; invalid input is rejected field by field
    pub fn set_contact(
        &mut self,
        name: &str,
        phone: &str,
        email: &str,
        special_requests: &str,
    ) -> AppResult<()> {
        let contact = Contact::new(name, phone)
            .with_email(email)
            .with_special_requests(special_requests);
        validate_contact(&contact, DraftKind::Booking)?;
        self.form.contact = Some(contact);
        Ok(())
    }

    // ========== Navigation ==========

    /// Check that `step` has everything it needs
    pub fn validate_step(&self, step: WizardStep) -> AppResult<()> {
        match step {
            WizardStep::Schedule => {
                let date = self.form.date.ok_or_else(|| required("date"))?;
                let time = self.form.time.ok_or_else(|| required("time"))?;
                self.catalog.check_date(date)?;
                self.catalog.check_time(time)
            }
            WizardStep::Table => {
                let table = self.form.table.as_ref().ok_or_else(|| required("table"))?;
                self.catalog.table(&table.id)?;
                if !(MIN_PARTY_SIZE..=MAX_PARTY_SIZE).contains(&self.form.party_size) {
                    return Err(AppError::field_invalid(ErrorCode::PartySizeOutOfRange, "party_size"));
                }
                Ok(())
            }
            WizardStep::Contact => {
                let contact = self.form.contact.as_ref().ok_or_else(|| required("contact"))?;
                validate_contact(contact, DraftKind::Booking)
            }
            WizardStep::Confirm => {
                for step in [WizardStep::Schedule, WizardStep::Table, WizardStep::Contact] {
                    self.validate_step(step)?;
                }
                Ok(())
            }
        }
    }

    pub fn is_step_complete(&self, step: WizardStep) -> bool {
        self.validate_step(step).is_ok()
    }

    /// Advance if the current step is complete
    pub fn next(&mut self) -> AppResult<WizardStep> {
        self.validate_step(self.step)?;
        let next = self
            .step
            .next()
            .ok_or_else(|| AppError::invalid_state("already at the last step"))?;
        self.step = next;
        Ok(next)
    }

    pub fn prev(&mut self) -> WizardStep {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
        self.step
    }

    /// Contact and selection to submit; only once `Confirm` is reached
    pub fn submission(&self) -> AppResult<(Contact, Selection)> {
        if self.step != WizardStep::Confirm {
            return Err(AppError::invalid_state(format!(
                "wizard is at step {}",
                self.step.number()
            )));
        }
        self.validate_step(WizardStep::Confirm)?;

        let (Some(date), Some(time), Some(table), Some(contact)) = (
            self.form.date,
            self.form.time,
            self.form.table.clone(),
            self.form.contact.clone(),
        ) else {
            return Err(required("booking"));
        };

        let booking = BookingSelection {
            date,
            time,
            table,
            party_size: self.form.party_size,
        };
        Ok((contact, Selection::Booking(booking)))
    }
}

fn required(field: &str) -> AppError {
    AppError::field_invalid(ErrorCode::RequiredField, field)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn seven_pm() -> NaiveTime {
        NaiveTime::from_hms_opt(19, 0, 0).unwrap()
    }

    fn wizard() -> BookingWizard {
        BookingWizard::new(BookingCatalog::all_available(today()))
    }

    #[test]
    fn test_steps_require_completion() {
        let mut w = wizard();
        assert_eq!(w.step(), WizardStep::Schedule);
        assert_eq!(w.form().party_size, 2);

        let err = w.next().unwrap_err();
        assert_eq!(err.field(), Some("date"));

        w.select_date(today()).unwrap();
        assert!(!w.is_step_complete(WizardStep::Schedule));
        w.select_time(seven_pm()).unwrap();
        assert_eq!(w.next().unwrap(), WizardStep::Table);

        assert!(w.next().is_err());
        w.select_table("table-3").unwrap();
        assert_eq!(w.next().unwrap(), WizardStep::Contact);

        let err = w.set_contact("Thandi", "0821234567", "", "").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidEmail);
        w.set_contact("Thandi", "082 123 4567", "thandi@example.com", "Window seat")
            .unwrap();
        assert_eq!(w.next().unwrap(), WizardStep::Confirm);
        assert!(w.next().is_err());

        let (contact, selection) = w.submission().unwrap();
        assert_eq!(contact.phone, "0821234567");
        let Selection::Booking(booking) = selection else {
            panic!("expected booking");
        };
        assert_eq!(booking.table.id, "table-3");
        assert_eq!(booking.party_size, 2);
    }

    #[test]
    fn test_prev_keeps_data() {
        let mut w = wizard();
        w.select_date(today()).unwrap();
        w.select_time(seven_pm()).unwrap();
        w.next().unwrap();
        assert_eq!(w.prev(), WizardStep::Schedule);
        assert_eq!(w.prev(), WizardStep::Schedule);
        assert_eq!(w.form().time, Some(seven_pm()));
    }

    #[test]
    fn test_unavailable_selection_rejected() {
        let mut catalog = BookingCatalog::all_available(today());
        catalog.set_table_available("table-1", false);
        catalog.set_slot_available(seven_pm(), false);
        let mut w = BookingWizard::new(catalog);

        assert_eq!(w.select_time(seven_pm()).unwrap_err().code, ErrorCode::SlotUnavailable);
        assert_eq!(w.select_table("table-1").unwrap_err().code, ErrorCode::TableUnavailable);
        assert!(w.form().table.is_none());
    }

    #[test]
    fn test_party_size_buttons() {
        let mut w = wizard();
        assert_eq!(w.decrement_party(), 1);
        assert_eq!(w.decrement_party(), 1);
        w.set_party_size(20).unwrap();
        assert_eq!(w.increment_party(), 20);
        assert!(w.set_party_size(0).is_err());
        assert!(w.set_party_size(21).is_err());
    }

    #[test]
    fn test_submission_before_confirm() {
        let w = wizard();
        assert_eq!(w.submission().unwrap_err().code, ErrorCode::InvalidState);
    }
}
