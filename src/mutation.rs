// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Optimistic create/update/delete with snapshot rollback.
//!
//! Updates and deletes change the local store first and, if the backend
//! refuses, put the touched entry back as it was. Only that entry is
//! restored, and only while nothing newer has replaced it. Creates are
//! never shown before the server returns the canonical entity.

use crate::api::{
    Api, Budgets, Categories, Listable, Mutable, RefData, RefNeeds, SavingsGoals,
};
use crate::error::ClientError;
use crate::models::{Id, SavingsGoal};
use crate::notice::Notices;
use crate::signal::InvalidationBus;
use crate::store::Store;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    Idle,
    Pending,
    Committed,
    RolledBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
    Deposit,
}

impl MutationKind {
    fn verb(&self) -> &'static str {
        match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
            MutationKind::Deposit => "add to",
        }
    }
}

/// Lifecycle of a single mutation: `Idle -> Pending -> Committed | RolledBack`.
#[derive(Debug, Clone)]
pub struct Mutation {
    kind: MutationKind,
    resource: &'static str,
    id: Option<Id>,
    state: MutationState,
}

impl Mutation {
    pub fn new(kind: MutationKind, resource: &'static str, id: Option<Id>) -> Self {
        Self {
            kind,
            resource,
            id,
            state: MutationState::Idle,
        }
    }

    pub fn state(&self) -> MutationState {
        self.state
    }

    pub fn kind(&self) -> MutationKind {
        self.kind
    }

    fn transition(&mut self, from: MutationState, to: MutationState) -> Result<(), ClientError> {
        if self.state != from {
            return Err(ClientError::validation(format!(
                "cannot move {} mutation from {:?} to {:?}",
                self.resource, self.state, to
            )));
        }
        tracing::debug!(resource = self.resource, kind = ?self.kind, id = ?self.id, state = ?to, "mutation");
        self.state = to;
        Ok(())
    }

    pub fn begin(&mut self) -> Result<(), ClientError> {
        self.transition(MutationState::Idle, MutationState::Pending)
    }

    pub fn commit(&mut self) -> Result<(), ClientError> {
        self.transition(MutationState::Pending, MutationState::Committed)
    }

    pub fn roll_back(&mut self) -> Result<(), ClientError> {
        self.transition(MutationState::Pending, MutationState::RolledBack)
    }
}

/// Category and budget stores shared with the controllers that look
/// things up in them.
#[derive(Clone)]
pub struct Refs {
    categories: Store<Categories>,
    budgets: Store<Budgets>,
}

impl Refs {
    pub fn new(categories: Store<Categories>, budgets: Store<Budgets>) -> Self {
        Self {
            categories,
            budgets,
        }
    }

    async fn data(&self, needs: RefNeeds, refresh: bool) -> RefData {
        let mut out = RefData::default();
        if needs.categories {
            out.categories = self.categories.cached(refresh).await;
        }
        if needs.budgets {
            out.budgets = self.budgets.cached(refresh).await;
        }
        out
    }
}

/// Drives mutations for one resource against its store.
pub struct Controller<R: Mutable> {
    api: Api,
    store: Store<R>,
    bus: InvalidationBus,
    notices: Notices,
    refs: Option<Refs>,
    in_flight: Arc<AtomicUsize>,
}

impl<R: Mutable> Clone for Controller<R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            store: self.store.clone(),
            bus: self.bus.clone(),
            notices: self.notices.clone(),
            refs: self.refs.clone(),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        InFlight(Arc::clone(counter))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<R: Mutable> Controller<R> {
    pub fn new(api: Api, store: Store<R>, bus: InvalidationBus, notices: Notices) -> Self {
        Self {
            api,
            store,
            bus,
            notices,
            refs: None,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_refs(mut self, refs: Refs) -> Self {
        self.refs = Some(refs);
        self
    }

    pub fn store(&self) -> &Store<R> {
        &self.store
    }

    /// True while any request issued by this controller is outstanding.
    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    fn fail(&self, kind: MutationKind, err: &ClientError) {
        self.notices.error(format!(
            "Failed to {} {}: {}",
            kind.verb(),
            R::NAME,
            err.message()
        ));
    }

    /// Broadcast after settling, whatever the outcome: a failed request may
    /// still have been partially applied server-side.
    fn settle(&self) {
        if R::INVALIDATES {
            self.bus.emit();
        }
    }

    /// Run the form and lookup guards. Nothing is written before both pass.
    async fn guard(&self, kind: MutationKind, input: &R::Input) -> Result<RefData, ClientError> {
        if let Err(e) = R::validate(input) {
            self.fail(kind, &e);
            return Err(e);
        }
        let needs = R::ref_needs(input);
        let Some(refs) = self.refs.as_ref().filter(|_| needs.any()) else {
            return Ok(RefData::default());
        };
        let data = refs.data(needs, false).await;
        if R::check_refs(input, &data).is_ok() {
            return Ok(data);
        }
        // cached lists may predate the referenced budget or category
        let data = refs.data(needs, true).await;
        if let Err(e) = R::check_refs(input, &data) {
            self.fail(kind, &e);
            return Err(e);
        }
        Ok(data)
    }

    pub async fn create(&self, input: &R::Input) -> Result<R::Entity, ClientError> {
        self.guard(MutationKind::Create, input).await?;
        let mut m = Mutation::new(MutationKind::Create, R::NAME, None);
        m.begin()?;
        let _guard = InFlight::enter(&self.in_flight);
        let result = self.api.create::<R>(input).await;
        let out = match result {
            Ok(entity) => {
                m.commit()?;
                self.store.upsert(entity.clone());
                Ok(entity)
            }
            Err(e) => {
                m.roll_back()?;
                self.fail(MutationKind::Create, &e);
                Err(e)
            }
        };
        self.settle();
        out
    }

    pub async fn update(&self, id: Id, input: &R::Input) -> Result<R::Entity, ClientError> {
        let refs = self.guard(MutationKind::Update, input).await?;
        let mut m = Mutation::new(MutationKind::Update, R::NAME, Some(id));
        let snap = self.store.snapshot(id);
        m.begin()?;
        self.store.modify(id, |e| R::patch(e, input, &refs));
        let applied = self.store.get(id);
        let _guard = InFlight::enter(&self.in_flight);
        let out = match self.api.update::<R>(id, input).await {
            Ok(entity) => {
                m.commit()?;
                self.store.upsert(entity.clone());
                Ok(entity)
            }
            Err(e) => {
                m.roll_back()?;
                self.store.restore(&snap, applied.as_ref());
                self.fail(MutationKind::Update, &e);
                Err(e)
            }
        };
        self.settle();
        out
    }

    pub async fn delete(&self, id: Id) -> Result<(), ClientError> {
        let mut m = Mutation::new(MutationKind::Delete, R::NAME, Some(id));
        let snap = self.store.snapshot(id);
        m.begin()?;
        self.store.remove(id);
        let _guard = InFlight::enter(&self.in_flight);
        let out = match self.api.delete::<R>(id).await {
            Ok(()) => {
                m.commit()?;
                Ok(())
            }
            Err(e) => {
                m.roll_back()?;
                self.store.restore(&snap, None);
                self.fail(MutationKind::Delete, &e);
                Err(e)
            }
        };
        self.settle();
        out
    }
}

impl Controller<SavingsGoals> {
    /// Add `amount` to a goal. Only additive deposits exist, so the amount
    /// must be positive.
    pub async fn deposit(&self, id: Id, amount: Decimal) -> Result<SavingsGoal, ClientError> {
        if amount <= Decimal::ZERO {
            let e = ClientError::validation("Enter a valid positive amount");
            self.fail(MutationKind::Deposit, &e);
            return Err(e);
        }
        let mut m = Mutation::new(MutationKind::Deposit, SavingsGoals::NAME, Some(id));
        let snap = self.store.snapshot(id);
        m.begin()?;
        self.store.modify(id, |g| g.current_amount += amount);
        let applied = self.store.get(id);
        let _guard = InFlight::enter(&self.in_flight);
        let out = match self.api.add_to_goal(id, amount).await {
            Ok(goal) => {
                m.commit()?;
                self.store.upsert(goal.clone());
                Ok(goal)
            }
            Err(e) => {
                m.roll_back()?;
                self.store.restore(&snap, applied.as_ref());
                self.fail(MutationKind::Deposit, &e);
                Err(e)
            }
        };
        self.settle();
        out
    }
}
