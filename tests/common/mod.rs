//! Scripted in-memory server standing in for MySQL.
#![allow(dead_code)]

use futures::future::BoxFuture;
use mysql_monitor::error::DriverError;
use mysql_monitor::session::{Cell, ConnectTarget, Connector, Driver, QueryResult, Session};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

pub const VERSION_QUERY: &str = "SELECT VERSION()";

/// What the fake server answers to one query.
#[derive(Clone, Debug)]
pub enum Reply {
    Rows(QueryResult),
    GoneAway,
    Error(String),
    /// Never answers; only a timeout gets the caller out.
    Hang,
}

#[derive(Default)]
struct State {
    // The last scripted reply for a query keeps being served.
    replies: HashMap<String, VecDeque<Reply>>,
    refuse_connect: bool,
    connects: usize,
    closes: usize,
    queries: Vec<String>,
}

#[derive(Clone, Default)]
pub struct FakeServer {
    state: Arc<Mutex<State>>,
}

impl FakeServer {
    pub fn new(version: &str) -> Self {
        let server = Self::default();
        server.on(VERSION_QUERY, Reply::Rows(rows(&["VERSION()"], vec![vec![Cell::from(version)]])));
        server
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Queue `reply` for `sql`.
    pub fn on(&self, sql: &str, reply: Reply) -> &Self {
        self.state()
            .replies
            .entry(sql.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn refuse_connections(&self, refuse: bool) {
        self.state().refuse_connect = refuse;
    }

    pub fn connects(&self) -> usize {
        self.state().connects
    }

    pub fn closes(&self) -> usize {
        self.state().closes
    }

    /// Every query issued, version lookups included.
    pub fn queries(&self) -> Vec<String> {
        self.state().queries.clone()
    }

    /// Queries other than the version lookup.
    pub fn sampled_queries(&self) -> Vec<String> {
        self.queries()
            .into_iter()
            .filter(|q| q != VERSION_QUERY)
            .collect()
    }

    pub fn connector(&self) -> Box<dyn Connector> {
        Box::new(FakeConnector {
            state: Arc::clone(&self.state),
        })
    }

    pub fn session(&self) -> Session {
        self.session_with_timeout(Duration::from_secs(5))
    }

    pub fn session_with_timeout(&self, timeout: Duration) -> Session {
        Session::new(
            ConnectTarget::Tcp {
                host: "fake-db".to_string(),
                port: 3306,
            },
            self.connector(),
            timeout,
        )
    }

    fn reply(&self, sql: &str) -> Reply {
        let mut state = self.state();
        state.queries.push(sql.to_string());
        match state.replies.get_mut(sql) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(Reply::Hang),
            Some(queue) => queue
                .front()
                .cloned()
                .unwrap_or_else(|| Reply::Error(format!("unscripted query: {sql}"))),
            None => Reply::Error(format!("unscripted query: {sql}")),
        }
    }
}

struct FakeConnector {
    state: Arc<Mutex<State>>,
}

impl Connector for FakeConnector {
    fn connect<'a>(
        &'a self,
        _target: &'a ConnectTarget,
    ) -> BoxFuture<'a, Result<Box<dyn Driver>, DriverError>> {
        Box::pin(async move {
            let server = FakeServer {
                state: Arc::clone(&self.state),
            };
            let mut state = server.state();
            if state.refuse_connect {
                return Err(DriverError::Database("connection refused".to_string()));
            }
            state.connects += 1;
            drop(state);
            Ok(Box::new(FakeDriver { server }) as Box<dyn Driver>)
        })
    }
}

struct FakeDriver {
    server: FakeServer,
}

impl Driver for FakeDriver {
    fn query<'a>(&'a mut self, sql: &'a str) -> BoxFuture<'a, Result<QueryResult, DriverError>> {
        Box::pin(async move {
            match self.server.reply(sql) {
                Reply::Rows(result) => Ok(result),
                Reply::GoneAway => Err(DriverError::GoneAway("MySQL server has gone away".to_string())),
                Reply::Error(message) => Err(DriverError::Database(message)),
                Reply::Hang => futures::future::pending().await,
            }
        })
    }

    fn close(self: Box<Self>) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            self.server.state().closes += 1;
        })
    }
}

pub fn rows(columns: &[&str], rows: Vec<Vec<Cell>>) -> QueryResult {
    QueryResult::new(columns.iter().map(ToString::to_string).collect(), rows)
}

/// Two-column `SHOW ... STATUS` / `SHOW ... VARIABLES` result.
pub fn name_values(pairs: &[(&str, &str)]) -> QueryResult {
    rows(
        &["Variable_name", "Value"],
        pairs
            .iter()
            .map(|(name, value)| vec![Cell::from(*name), Cell::from(*value)])
            .collect(),
    )
}
