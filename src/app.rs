// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::{Accounts, Api, Budgets, Categories, Mutable, SavingsGoals, Transactions};
use crate::config::Config;
use crate::mutation::{Controller, Refs};
use crate::notice::Notices;
use crate::session::Session;
use crate::signal::InvalidationBus;
use crate::store::Store;
use crate::transport::{HttpTransport, Transport};
use crate::views::{self, Dashboard};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::task::JoinHandle;

fn controller<R: Mutable>(api: &Api, bus: &InvalidationBus, notices: &Notices) -> Controller<R> {
    Controller::new(
        api.clone(),
        Store::new(api.clone()),
        bus.clone(),
        notices.clone(),
    )
}

/// Everything a page needs: stores, controllers, the bus and notices.
pub struct App {
    pub config: Config,
    pub session: Session,
    pub api: Api,
    pub bus: InvalidationBus,
    pub notices: Notices,
    pub accounts: Controller<Accounts>,
    pub categories: Store<Categories>,
    pub transactions: Controller<Transactions>,
    pub budgets: Controller<Budgets>,
    pub goals: Controller<SavingsGoals>,
}

impl App {
    pub fn new(config: Config, session: Session) -> anyhow::Result<Self> {
        let transport = HttpTransport::new(&config.api_url, session.clone())?;
        Ok(Self::with_transport(config, session, Arc::new(transport)))
    }

    pub fn with_transport(config: Config, session: Session, transport: Arc<dyn Transport>) -> Self {
        let api = Api::new(transport);
        let bus = InvalidationBus::new();
        let notices = Notices::new();
        let categories = Store::new(api.clone());
        let budget_store = Store::new(api.clone());
        let refs = Refs::new(categories.clone(), budget_store.clone());
        let accounts = controller(&api, &bus, &notices);
        let transactions = controller(&api, &bus, &notices).with_refs(refs.clone());
        let budgets = Controller::new(api.clone(), budget_store, bus.clone(), notices.clone())
            .with_refs(refs);
        let goals = controller(&api, &bus, &notices);
        Self {
            categories,
            config,
            session,
            api,
            bus,
            notices,
            accounts,
            transactions,
            budgets,
            goals,
        }
    }

    /// Load every store at once. A failing store degrades to empty with a
    /// banner; the others still load.
    pub async fn load_all(&self) {
        let (a, c, t, b, g) = tokio::join!(
            self.accounts.store().load(),
            self.categories.load(),
            self.transactions.store().load(),
            self.budgets.store().load(),
            self.goals.store().load(),
        );
        let failures = [a.err(), c.err(), t.err(), b.err(), g.err()];
        if failures.iter().any(Option::is_some) {
            for banner in self.banners() {
                self.notices.error(banner);
            }
        }
    }

    /// Load-failure banners of all stores.
    pub fn banners(&self) -> Vec<String> {
        [
            self.accounts.store().error(),
            self.categories.error(),
            self.transactions.store().error(),
            self.budgets.store().error(),
            self.goals.store().error(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Start the documented listeners (accounts, budgets, transactions)
    /// and the periodic poller.
    pub fn watch(&self) -> Vec<JoinHandle<()>> {
        vec![
            self.bus.listen(self.accounts.store().clone()),
            self.bus.listen(self.budgets.store().clone()),
            self.bus.listen(self.transactions.store().clone()),
            self.bus.spawn_poller(self.config.refresh_interval),
        ]
    }

    pub fn dashboard(&self, today: NaiveDate) -> Dashboard {
        views::dashboard(
            &self.accounts.store().items(),
            &self.transactions.store().items(),
            &self.budgets.store().items(),
            &self.goals.store().items(),
            today,
            self.config.months,
        )
    }
}
