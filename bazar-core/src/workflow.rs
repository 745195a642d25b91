//! List creation workflow
//!
//! A finite-state machine for building a shopping list: collect the
//! trip details, accumulate items with an optional check-off price,
//! then finalize and persist. The machine is independent of any
//! rendering concern; the CLI (or any other surface) drives it through
//! its methods and renders the resulting state.
//!
//! Steps: `Details -> List -> Saving -> Done`. `Saving` exists only
//! for the duration of the store call and guards against repeated
//! submission; a failed save returns to `List` with the draft intact.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{list, Item, List, Unit, User};
use crate::ports::ListStore;

/// Wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Collecting optional name and required date
    Details,
    /// Collecting items
    List,
    /// A save is in flight; no mutations or re-submission allowed
    Saving,
    /// The list was persisted; the workflow is finished
    Done,
}

/// In-memory draft of a list under construction
#[derive(Debug, Clone, Default)]
struct Draft {
    name: String,
    date: Option<NaiveDate>,
    items: Vec<Item>,
}

/// The list-creation state machine
pub struct CreationWorkflow {
    step: Step,
    draft: Draft,
    /// Start of the current calendar day; dates strictly before this
    /// are not selectable.
    today: NaiveDate,
}

impl CreationWorkflow {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            step: Step::Details,
            draft: Draft::default(),
            today,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn name(&self) -> &str {
        &self.draft.name
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.draft.date
    }

    pub fn items(&self) -> &[Item] {
        &self.draft.items
    }

    /// Running total over checked items
    pub fn total(&self) -> Decimal {
        list::total(&self.draft.items)
    }

    fn require_step(&self, expected: Step, action: &str) -> Result<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(Error::validation(format!(
                "cannot {} at this step",
                action
            )))
        }
    }

    /// Set the optional list name (Details step)
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.require_step(Step::Details, "set the name")?;
        self.draft.name = name.to_string();
        Ok(())
    }

    /// Choose the trip date (Details step). Dates before the start of
    /// the current calendar day are rejected.
    pub fn set_date(&mut self, date: NaiveDate) -> Result<()> {
        self.require_step(Step::Details, "set the date")?;
        if date < self.today {
            return Err(Error::validation("the bazar date cannot be in the past"));
        }
        self.draft.date = Some(date);
        Ok(())
    }

    /// Advance from Details to List. Blocked until a date is set.
    pub fn advance(&mut self) -> Result<()> {
        self.require_step(Step::Details, "continue")?;
        if self.draft.date.is_none() {
            return Err(Error::validation("please select a bazar date first"));
        }
        self.step = Step::List;
        Ok(())
    }

    /// Go back from List to Details. The name, date, and accumulated
    /// items are all preserved.
    pub fn back(&mut self) -> Result<()> {
        self.require_step(Step::List, "go back")?;
        self.step = Step::Details;
        Ok(())
    }

    /// Add a new unchecked item to the draft.
    ///
    /// `amount` is the raw user input; it must parse as a number and
    /// be strictly positive.
    pub fn add_item(&mut self, name: &str, amount: &str, unit: Unit) -> Result<Uuid> {
        self.require_step(Step::List, "add items")?;

        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("invalid name: item name cannot be empty"));
        }

        let amount: Decimal = amount
            .trim()
            .parse()
            .map_err(|_| Error::validation("invalid amount: enter a number"))?;
        if amount <= Decimal::ZERO {
            return Err(Error::validation("invalid amount: must be greater than zero"));
        }

        let item = Item::new(name, amount, unit);
        let id = item.id;
        self.draft.items.push(item);
        Ok(id)
    }

    /// Remove one item from the draft by id
    pub fn remove_item(&mut self, id: Uuid) -> Result<()> {
        self.require_step(Step::List, "remove items")?;
        let before = self.draft.items.len();
        self.draft.items.retain(|item| item.id != id);
        if self.draft.items.len() == before {
            return Err(Error::not_found(format!("item {}", id)));
        }
        Ok(())
    }

    /// Check an item off, recording its purchase price. `price` is the
    /// raw user input from the price prompt.
    pub fn check_item(&mut self, id: Uuid, price: &str) -> Result<()> {
        self.require_step(Step::List, "check items")?;
        let price: Decimal = price
            .trim()
            .parse()
            .map_err(|_| Error::validation("invalid price: enter a number"))?;
        let item = self.item_mut(id)?;
        item.check(price);
        Ok(())
    }

    /// Uncheck an item, clearing its recorded price. No prompt.
    pub fn uncheck_item(&mut self, id: Uuid) -> Result<()> {
        self.require_step(Step::List, "uncheck items")?;
        let item = self.item_mut(id)?;
        item.uncheck();
        Ok(())
    }

    fn item_mut(&mut self, id: Uuid) -> Result<&mut Item> {
        self.draft
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| Error::not_found(format!("item {}", id)))
    }

    /// Finalize the draft and persist it.
    ///
    /// Preconditions: at least one item, and a date (re-validated here
    /// even though `advance` already required it; if the date is
    /// somehow absent the workflow routes back to Details instead of
    /// saving). On store failure the draft and the List step are kept
    /// so nothing is lost and the user can retry.
    pub fn finish(&mut self, user: &User, store: &dyn ListStore) -> Result<List> {
        match self.step {
            Step::Saving => {
                return Err(Error::validation("a save is already in progress"));
            }
            Step::Done => {
                return Err(Error::validation("this list has already been saved"));
            }
            Step::Details => {
                return Err(Error::validation("add items before finishing"));
            }
            Step::List => {}
        }

        if self.draft.items.is_empty() {
            return Err(Error::validation("add at least one item before finishing"));
        }

        let date = match self.draft.date {
            Some(date) => date,
            None => {
                // Should have been caught at the Details step; route back
                // rather than saving a dateless list.
                self.step = Step::Details;
                return Err(Error::validation("please select a bazar date first"));
            }
        };

        self.step = Step::Saving;
        let list = List::new(&self.draft.name, date, user, self.draft.items.clone());

        match store.put(&list) {
            Ok(()) => {
                self.step = Step::Done;
                Ok(list)
            }
            Err(e) => {
                self.step = Step::List;
                Err(e)
            }
        }
    }
}
