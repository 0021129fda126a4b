use actix_web::{web, HttpRequest};

use libvantage::config::{ServerConfig, SharedSettings};
use libvantage::error::VantageError;
use libvantage::storage::{AccountStore, DataLayout};

/// State shared by every worker
#[derive(Debug)]
pub struct VantageAppData {
    pub layout: DataLayout,
    pub accounts: AccountStore,
    pub settings: SharedSettings,
    pub max_upload_bytes: usize,
}

impl VantageAppData {
    /// Prepares the home directory and loads the registered accounts
    pub fn from_config(config: &ServerConfig) -> Result<VantageAppData, VantageError> {
        let layout = config.layout();
        layout.init()?;
        let accounts = AccountStore::open(layout.accounts_path())?;
        log::info!(
            "serving {} accounts from {:?}",
            accounts.len(),
            layout.home()
        );

        Ok(VantageAppData {
            layout,
            accounts,
            settings: SharedSettings::from_config(config),
            max_upload_bytes: config.max_upload_bytes,
        })
    }
}

pub fn app_data(req: &HttpRequest) -> Result<&web::Data<VantageAppData>, VantageError> {
    req.app_data::<web::Data<VantageAppData>>().ok_or_else(|| {
        log::error!("could not get app data from request");
        VantageError::basic_str("app data is not configured")
    })
}
