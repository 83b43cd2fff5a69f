//! Business logic services

pub mod catalog;
pub mod loans;
pub mod members;
pub mod pricing;
pub mod stats;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub members: members::MembersService,
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        Self {
            members: members::MembersService::new(repository.clone()),
            catalog: catalog::CatalogService::new(repository.clone(), &config.catalog),
            loans: loans::LoansService::new(repository.clone(), config.loans.clone()),
            stats: stats::StatsService::new(repository, config.reports.clone()),
        }
    }
}
