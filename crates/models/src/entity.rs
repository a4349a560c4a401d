use std::fmt;
use std::str::FromStr;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::appointment::Appointment;
use crate::company::CompanyInfo;
use crate::customer::Customer;
use crate::errors::ModelError;
use crate::finance::FinancialTransaction;
use crate::kit::Kit;
use crate::quote::Quote;
use crate::sale::Sale;
use crate::service_order::ServiceOrder;
use crate::session::Session;
use crate::settings::Settings;
use crate::stock::StockItem;
use crate::user::User;

/// Every persisted collection. One file per variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Customers,
    ServiceOrders,
    Stock,
    Sales,
    FinancialTransactions,
    Users,
    CompanyInfo,
    Appointments,
    Quotes,
    Kits,
    Settings,
    Session,
}

impl EntityKind {
    pub const ALL: [EntityKind; 12] = [
        EntityKind::Customers,
        EntityKind::ServiceOrders,
        EntityKind::Stock,
        EntityKind::Sales,
        EntityKind::FinancialTransactions,
        EntityKind::Users,
        EntityKind::CompanyInfo,
        EntityKind::Appointments,
        EntityKind::Quotes,
        EntityKind::Kits,
        EntityKind::Settings,
        EntityKind::Session,
    ];

    /// Logical name as used by callers and the `/api/data/:entity` route.
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Customers => "customers",
            EntityKind::ServiceOrders => "serviceOrders",
            EntityKind::Stock => "stock",
            EntityKind::Sales => "sales",
            EntityKind::FinancialTransactions => "financialTransactions",
            EntityKind::Users => "users",
            EntityKind::CompanyInfo => "companyInfo",
            EntityKind::Appointments => "appointments",
            EntityKind::Quotes => "quotes",
            EntityKind::Kits => "kits",
            EntityKind::Settings => "settings",
            EntityKind::Session => "session",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            EntityKind::Customers => "customers.json",
            EntityKind::ServiceOrders => "service_orders.json",
            EntityKind::Stock => "stock.json",
            EntityKind::Sales => "sales.json",
            EntityKind::FinancialTransactions => "financial_transactions.json",
            EntityKind::Users => "users.json",
            EntityKind::CompanyInfo => "company_info.json",
            EntityKind::Appointments => "appointments.json",
            EntityKind::Quotes => "quotes.json",
            EntityKind::Kits => "kits.json",
            EntityKind::Settings => "settings.json",
            EntityKind::Session => "session.json",
        }
    }

    /// Stored as a single object rather than an array.
    pub fn is_singleton(self) -> bool {
        matches!(self, EntityKind::CompanyInfo | EntityKind::Settings | EntityKind::Session)
    }

    /// Default document, as JSON, written on first read.
    pub fn default_value(self) -> Value {
        fn of<T: Serialize + Default>() -> Value {
            serde_json::to_value(T::default()).unwrap_or(Value::Null)
        }
        match self {
            EntityKind::CompanyInfo => of::<CompanyInfo>(),
            EntityKind::Settings => of::<Settings>(),
            EntityKind::Session => of::<Session>(),
            _ => Value::Array(Vec::new()),
        }
    }

    /// Check that `value` deserializes into this entity's typed shape.
    pub fn validate(self, value: &Value) -> Result<(), ModelError> {
        fn check<T: DeserializeOwned>(kind: EntityKind, value: &Value) -> Result<(), ModelError> {
            serde_json::from_value::<T>(value.clone())
                .map(|_| ())
                .map_err(|e| ModelError::Validation(format!("{}: {e}", kind.name())))
        }
        match self {
            EntityKind::Customers => check::<Vec<Customer>>(self, value),
            EntityKind::ServiceOrders => check::<Vec<ServiceOrder>>(self, value),
            EntityKind::Stock => check::<Vec<StockItem>>(self, value),
            EntityKind::Sales => check::<Vec<Sale>>(self, value),
            EntityKind::FinancialTransactions => check::<Vec<FinancialTransaction>>(self, value),
            EntityKind::Users => check::<Vec<User>>(self, value),
            EntityKind::CompanyInfo => check::<CompanyInfo>(self, value),
            EntityKind::Appointments => check::<Vec<Appointment>>(self, value),
            EntityKind::Quotes => check::<Vec<Quote>>(self, value),
            EntityKind::Kits => check::<Vec<Kit>>(self, value),
            EntityKind::Settings => check::<Settings>(self, value),
            EntityKind::Session => check::<Session>(self, value),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| ModelError::UnknownEntity(s.to_string()))
    }
}

/// A whole document as stored in one entity file.
pub trait Document: Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static {
    const KIND: EntityKind;
}

impl Document for Vec<Customer> { const KIND: EntityKind = EntityKind::Customers; }
impl Document for Vec<ServiceOrder> { const KIND: EntityKind = EntityKind::ServiceOrders; }
impl Document for Vec<StockItem> { const KIND: EntityKind = EntityKind::Stock; }
impl Document for Vec<Sale> { const KIND: EntityKind = EntityKind::Sales; }
impl Document for Vec<FinancialTransaction> { const KIND: EntityKind = EntityKind::FinancialTransactions; }
impl Document for Vec<User> { const KIND: EntityKind = EntityKind::Users; }
impl Document for CompanyInfo { const KIND: EntityKind = EntityKind::CompanyInfo; }
impl Document for Vec<Appointment> { const KIND: EntityKind = EntityKind::Appointments; }
impl Document for Vec<Quote> { const KIND: EntityKind = EntityKind::Quotes; }
impl Document for Vec<Kit> { const KIND: EntityKind = EntityKind::Kits; }
impl Document for Settings { const KIND: EntityKind = EntityKind::Settings; }
impl Document for Session { const KIND: EntityKind = EntityKind::Session; }
