use std::path::{Path, PathBuf};
use std::sync::Arc;

use models::{
    appointment::Appointment, company::CompanyInfo, customer::Customer,
    finance::FinancialTransaction, kit::Kit, quote::Quote, sale::Sale,
    service_order::ServiceOrder, session::Session, settings::Settings, stock::StockItem,
    user::User, Document, EntityKind,
};

use super::{json_doc_store::JsonDocStore, raw::RawDocStore, repository::Repository};
use crate::errors::ServiceError;

/// Maps every entity onto its file under `data_dir`.
///
/// Each accessor builds a fresh [`JsonDocStore`], so there is no cache: every
/// get is a full read and every save a full overwrite. Saves to different
/// entities are independent.
#[derive(Clone, Debug)]
pub struct FlatFileStore {
    data_dir: PathBuf,
    pretty: bool,
}

impl FlatFileStore {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self { data_dir: data_dir.into(), pretty: true }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn data_dir(&self) -> &Path { &self.data_dir }

    pub fn path_of(&self, kind: EntityKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }

    /// Typed store for one entity document.
    pub fn doc<T: Document>(&self) -> JsonDocStore<T> {
        JsonDocStore::new(T::KIND.name(), self.path_of(T::KIND), T::default()).with_pretty(self.pretty)
    }

    /// Same store behind the [`Repository`] seam.
    pub fn repository<T: Document>(&self) -> Arc<dyn Repository<T>> {
        Arc::new(self.doc::<T>())
    }

    pub fn raw(&self) -> RawDocStore {
        RawDocStore::new(self.data_dir.clone(), self.pretty)
    }

    pub async fn get<T: Document>(&self) -> Result<T, ServiceError> {
        self.doc::<T>().get().await
    }

    pub async fn save<T: Document>(&self, data: &T) -> Result<(), ServiceError> {
        self.doc::<T>().save(data).await
    }
}

macro_rules! entity_accessors {
    ($($get:ident, $save:ident => $ty:ty;)*) => {
        impl FlatFileStore {
            $(
                pub async fn $get(&self) -> Result<$ty, ServiceError> {
                    self.get::<$ty>().await
                }

                pub async fn $save(&self, data: &$ty) -> Result<(), ServiceError> {
                    self.save::<$ty>(data).await
                }
            )*
        }
    };
}

entity_accessors! {
    get_customers, save_customers => Vec<Customer>;
    get_service_orders, save_service_orders => Vec<ServiceOrder>;
    get_stock, save_stock => Vec<StockItem>;
    get_sales, save_sales => Vec<Sale>;
    get_financial_transactions, save_financial_transactions => Vec<FinancialTransaction>;
    get_users, save_users => Vec<User>;
    get_company_info, save_company_info => CompanyInfo;
    get_appointments, save_appointments => Vec<Appointment>;
    get_quotes, save_quotes => Vec<Quote>;
    get_kits, save_kits => Vec<Kit>;
    get_settings, save_settings => Settings;
    get_session, save_session => Session;
}
