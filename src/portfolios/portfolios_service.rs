use async_trait::async_trait;
use log::debug;
use std::collections::HashSet;
use std::sync::Arc;

use super::portfolios_aggregator::aggregate;
use super::portfolios_model::{
    NewPortfolio, Portfolio, PortfolioDB, PortfolioMetrics, PortfolioUpdate, PortfolioWithMetrics,
};
use super::portfolios_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
use crate::constants::{DEFAULT_FOLDER_COLOR, DEFAULT_FOLDER_NAME, FOLDER_ICON};
use crate::portfolios::{PortfolioError, Result};

/// Service for managing portfolio folders and their metrics.
///
/// Enforces the folder domain rules: the default folder cannot be
/// deleted, deleting a folder reassigns its properties first, and
/// re-parenting may not create a cycle.
pub struct PortfolioService<R: PortfolioRepositoryTrait> {
    repo: Arc<R>,
}

impl<R: PortfolioRepositoryTrait> PortfolioService<R> {
    /// Creates a new PortfolioService instance
    pub fn new(repo: Arc<R>) -> Self {
        PortfolioService { repo }
    }

    /// Rejects a parent assignment whose ancestor chain would reach the
    /// folder itself
    fn check_parent_cycle(&self, folder_id: &str, parent_id: &str, user_id: &str) -> Result<()> {
        let mut seen = HashSet::new();
        let mut current = Some(parent_id.to_string());

        while let Some(ancestor_id) = current {
            if ancestor_id == folder_id {
                return Err(PortfolioError::ParentCycle(format!(
                    "Folder {} cannot become a descendant of itself",
                    folder_id
                )));
            }
            if !seen.insert(ancestor_id.clone()) {
                // Pre-existing cycle in stored data; stop walking
                break;
            }
            current = self
                .repo
                .find_by_id(&ancestor_id, user_id)?
                .and_then(|p| p.parent_id);
        }

        Ok(())
    }

    /// Slash-separated path from the root folder down to this one
    fn folder_path(&self, portfolio: &Portfolio) -> Result<String> {
        let mut segments = vec![portfolio.name.clone()];
        let mut seen = HashSet::new();
        seen.insert(portfolio.id.clone());
        let mut current = portfolio.parent_id.clone();

        while let Some(parent_id) = current {
            if !seen.insert(parent_id.clone()) {
                break;
            }
            match self.repo.find_by_id(&parent_id, &portfolio.user_id)? {
                Some(parent) => {
                    segments.push(parent.name.clone());
                    current = parent.parent_id;
                }
                None => break,
            }
        }

        segments.reverse();
        Ok(segments.join("/"))
    }

    fn with_metrics(&self, portfolio: Portfolio) -> Result<PortfolioWithMetrics> {
        let properties = self.repo.properties_in(&portfolio.id, &portfolio.user_id)?;
        let folder_path = self.folder_path(&portfolio)?;
        Ok(PortfolioWithMetrics {
            metrics: aggregate(&properties),
            folder_path,
            portfolio,
        })
    }
}

#[async_trait]
impl<R: PortfolioRepositoryTrait> PortfolioServiceTrait for PortfolioService<R> {
    async fn create_portfolio(&self, new_portfolio: NewPortfolio) -> Result<Portfolio> {
        new_portfolio.validate()?;

        if let Some(parent_id) = &new_portfolio.parent_id {
            self.repo
                .find_by_id(parent_id, &new_portfolio.user_id)?
                .ok_or_else(|| {
                    PortfolioError::NotFound(format!(
                        "Parent folder with id {} not found",
                        parent_id
                    ))
                })?;
        }

        let mut portfolio_db: PortfolioDB = new_portfolio.into();
        if portfolio_db.id.is_empty() {
            portfolio_db.id = uuid::Uuid::new_v4().to_string();
        }

        debug!(
            "Creating folder '{}' for user {}",
            portfolio_db.name, portfolio_db.user_id
        );
        self.repo.create(portfolio_db).await
    }

    fn list_portfolios(&self, user_id: &str, include_default: bool) -> Result<Vec<Portfolio>> {
        self.repo.list(user_id, include_default)
    }

    fn get_portfolio(&self, portfolio_id: &str, user_id: &str) -> Result<Portfolio> {
        self.repo.find_by_id(portfolio_id, user_id)?.ok_or_else(|| {
            PortfolioError::NotFound(format!("Folder with id {} not found", portfolio_id))
        })
    }

    async fn update_portfolio(&self, update: PortfolioUpdate, user_id: &str) -> Result<Portfolio> {
        update.validate()?;
        let portfolio_id = update.id.clone().unwrap_or_default();
        let existing = self.get_portfolio(&portfolio_id, user_id)?;

        let parent_id = match update.parent_id {
            Some(new_parent) => {
                self.repo.find_by_id(&new_parent, user_id)?.ok_or_else(|| {
                    PortfolioError::NotFound(format!(
                        "Parent folder with id {} not found",
                        new_parent
                    ))
                })?;
                self.check_parent_cycle(&portfolio_id, &new_parent, user_id)?;
                Some(new_parent)
            }
            None => existing.parent_id.clone(),
        };

        let portfolio_db = PortfolioDB {
            id: existing.id.clone(),
            user_id: existing.user_id.clone(),
            name: update.name.unwrap_or(existing.name),
            description: update.description.or(existing.description),
            color: update.color.unwrap_or(existing.color),
            icon: update.icon.unwrap_or(existing.icon),
            parent_id,
            is_default: existing.is_default,
            created_at: existing.created_at,
            updated_at: chrono::Utc::now().naive_utc(),
        };

        self.repo.update(portfolio_db).await
    }

    async fn delete_portfolio(
        &self,
        portfolio_id: &str,
        user_id: &str,
        move_properties_to: Option<&str>,
    ) -> Result<()> {
        let portfolio = self.get_portfolio(portfolio_id, user_id)?;

        if portfolio.is_default {
            return Err(PortfolioError::DefaultFolderProtected(format!(
                "Folder '{}' is the default folder",
                portfolio.name
            )));
        }

        // Resolve the destination before touching anything
        let target = match move_properties_to {
            Some(target_id) => {
                self.repo.find_by_id(target_id, user_id)?.ok_or_else(|| {
                    PortfolioError::NotFound(format!(
                        "Target folder with id {} not found",
                        target_id
                    ))
                })?;
                Some(target_id.to_string())
            }
            None => self.repo.find_default(user_id)?.map(|p| p.id),
        };

        debug!(
            "Deleting folder {} for user {}, moving properties to {:?}",
            portfolio_id, user_id, target
        );
        self.repo
            .delete_with_reassignment(portfolio_id, user_id, target.as_deref())
            .await?;
        Ok(())
    }

    async fn move_property_to_portfolio(
        &self,
        property_id: &str,
        portfolio_id: &str,
        user_id: &str,
    ) -> Result<()> {
        self.get_portfolio(portfolio_id, user_id)?;

        let affected = self
            .repo
            .assign_property(property_id, Some(portfolio_id), user_id)
            .await?;
        if affected == 0 {
            return Err(PortfolioError::NotFound(format!(
                "Property with id {} not found",
                property_id
            )));
        }
        Ok(())
    }

    fn get_portfolio_metrics(
        &self,
        portfolio_id: &str,
        user_id: &str,
    ) -> Result<PortfolioMetrics> {
        self.get_portfolio(portfolio_id, user_id)?;
        let properties = self.repo.properties_in(portfolio_id, user_id)?;
        Ok(aggregate(&properties))
    }

    fn get_portfolio_with_metrics(
        &self,
        portfolio_id: &str,
        user_id: &str,
    ) -> Result<PortfolioWithMetrics> {
        let portfolio = self.get_portfolio(portfolio_id, user_id)?;
        self.with_metrics(portfolio)
    }

    fn list_portfolios_with_metrics(
        &self,
        user_id: &str,
        include_default: bool,
    ) -> Result<Vec<PortfolioWithMetrics>> {
        self.repo
            .list(user_id, include_default)?
            .into_iter()
            .map(|portfolio| self.with_metrics(portfolio))
            .collect()
    }

    fn get_default_portfolio(&self, user_id: &str) -> Result<Option<Portfolio>> {
        self.repo.find_default(user_id)
    }

    async fn initialize_default_portfolio(&self, user_id: &str) -> Result<Portfolio> {
        if let Some(existing) = self.repo.find_default(user_id)? {
            return Ok(existing);
        }

        let now = chrono::Utc::now().naive_utc();
        let portfolio_db = PortfolioDB {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: DEFAULT_FOLDER_NAME.to_string(),
            description: Some("Default folder containing all properties".to_string()),
            color: DEFAULT_FOLDER_COLOR.to_string(),
            icon: FOLDER_ICON.to_string(),
            parent_id: None,
            is_default: true,
            created_at: now,
            updated_at: now,
        };

        let portfolio = self.repo.create(portfolio_db).await?;
        let adopted = self.repo.adopt_unassigned(&portfolio.id, user_id).await?;
        debug!(
            "Initialized default folder for user {}, adopted {} properties",
            user_id, adopted
        );

        Ok(portfolio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockState {
        portfolios: Vec<Portfolio>,
        assignments: Vec<(String, Option<String>)>,
        reassigned: Vec<(String, Option<String>)>,
        deleted: Vec<String>,
        adopted: Vec<String>,
    }

    #[derive(Default)]
    struct MockPortfolioRepository {
        state: Mutex<MockState>,
        property_ids: Vec<String>,
    }

    impl MockPortfolioRepository {
        fn with_portfolios(portfolios: Vec<Portfolio>) -> Self {
            Self {
                state: Mutex::new(MockState {
                    portfolios,
                    ..Default::default()
                }),
                property_ids: vec![],
            }
        }
    }

    fn folder(id: &str, user_id: &str, parent_id: Option<&str>, is_default: bool) -> Portfolio {
        let now = chrono::Utc::now().naive_utc();
        Portfolio {
            id: id.to_string(),
            user_id: user_id.to_string(),
            name: id.to_string(),
            description: None,
            color: "#10B981".to_string(),
            icon: "folder".to_string(),
            parent_id: parent_id.map(str::to_string),
            is_default,
            created_at: now,
            updated_at: now,
        }
    }

    #[async_trait]
    impl PortfolioRepositoryTrait for MockPortfolioRepository {
        async fn create(&self, portfolio_db: PortfolioDB) -> Result<Portfolio> {
            let portfolio: Portfolio = portfolio_db.into();
            let mut state = self.state.lock().unwrap();
            state.portfolios.push(portfolio.clone());
            Ok(portfolio)
        }

        fn list(&self, user_id: &str, include_default: bool) -> Result<Vec<Portfolio>> {
            let state = self.state.lock().unwrap();
            Ok(state
                .portfolios
                .iter()
                .filter(|p| p.user_id == user_id && (include_default || !p.is_default))
                .cloned()
                .collect())
        }

        fn find_by_id(&self, portfolio_id: &str, user_id: &str) -> Result<Option<Portfolio>> {
            let state = self.state.lock().unwrap();
            Ok(state
                .portfolios
                .iter()
                .find(|p| p.id == portfolio_id && p.user_id == user_id)
                .cloned())
        }

        fn find_default(&self, user_id: &str) -> Result<Option<Portfolio>> {
            let state = self.state.lock().unwrap();
            Ok(state
                .portfolios
                .iter()
                .find(|p| p.user_id == user_id && p.is_default)
                .cloned())
        }

        async fn update(&self, portfolio_db: PortfolioDB) -> Result<Portfolio> {
            let portfolio: Portfolio = portfolio_db.into();
            let mut state = self.state.lock().unwrap();
            if let Some(existing) = state.portfolios.iter_mut().find(|p| p.id == portfolio.id) {
                *existing = portfolio.clone();
            }
            Ok(portfolio)
        }

        async fn delete_with_reassignment(
            &self,
            portfolio_id: &str,
            _user_id: &str,
            target: Option<&str>,
        ) -> Result<usize> {
            let mut state = self.state.lock().unwrap();
            state
                .reassigned
                .push((portfolio_id.to_string(), target.map(str::to_string)));
            state.deleted.push(portfolio_id.to_string());
            state.portfolios.retain(|p| p.id != portfolio_id);
            Ok(1)
        }

        fn properties_in(&self, _portfolio_id: &str, _user_id: &str) -> Result<Vec<Property>> {
            Ok(vec![])
        }

        async fn assign_property(
            &self,
            property_id: &str,
            portfolio_id: Option<&str>,
            _user_id: &str,
        ) -> Result<usize> {
            let known = self.property_ids.iter().any(|id| id == property_id);
            let mut state = self.state.lock().unwrap();
            state
                .assignments
                .push((property_id.to_string(), portfolio_id.map(str::to_string)));
            Ok(if known { 1 } else { 0 })
        }

        async fn adopt_unassigned(&self, portfolio_id: &str, _user_id: &str) -> Result<usize> {
            let mut state = self.state.lock().unwrap();
            state.adopted.push(portfolio_id.to_string());
            Ok(0)
        }
    }

    use crate::properties::Property;

    const USER: &str = "user-1";

    #[tokio::test]
    async fn test_delete_default_folder_is_rejected_without_mutation() {
        let repo = Arc::new(MockPortfolioRepository::with_portfolios(vec![folder(
            "default", USER, None, true,
        )]));
        let service = PortfolioService::new(repo.clone());

        let result = service.delete_portfolio("default", USER, None).await;
        assert!(matches!(
            result,
            Err(PortfolioError::DefaultFolderProtected(_))
        ));

        let state = repo.state.lock().unwrap();
        assert!(state.deleted.is_empty());
        assert!(state.reassigned.is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_folder_is_not_found() {
        let repo = Arc::new(MockPortfolioRepository::default());
        let service = PortfolioService::new(repo);

        let result = service.delete_portfolio("ghost", USER, None).await;
        assert!(matches!(result, Err(PortfolioError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_with_missing_target_leaves_folder_untouched() {
        let repo = Arc::new(MockPortfolioRepository::with_portfolios(vec![folder(
            "rentals", USER, None, false,
        )]));
        let service = PortfolioService::new(repo.clone());

        let result = service
            .delete_portfolio("rentals", USER, Some("ghost"))
            .await;
        assert!(matches!(result, Err(PortfolioError::NotFound(_))));

        let state = repo.state.lock().unwrap();
        assert!(state.deleted.is_empty());
    }

    #[tokio::test]
    async fn test_delete_reassigns_to_explicit_target() {
        let repo = Arc::new(MockPortfolioRepository::with_portfolios(vec![
            folder("rentals", USER, None, false),
            folder("flips", USER, None, false),
        ]));
        let service = PortfolioService::new(repo.clone());

        service
            .delete_portfolio("rentals", USER, Some("flips"))
            .await
            .unwrap();

        let state = repo.state.lock().unwrap();
        assert_eq!(
            state.reassigned,
            vec![("rentals".to_string(), Some("flips".to_string()))]
        );
    }

    #[tokio::test]
    async fn test_delete_falls_back_to_default_folder() {
        let repo = Arc::new(MockPortfolioRepository::with_portfolios(vec![
            folder("rentals", USER, None, false),
            folder("default", USER, None, true),
        ]));
        let service = PortfolioService::new(repo.clone());

        service.delete_portfolio("rentals", USER, None).await.unwrap();

        let state = repo.state.lock().unwrap();
        assert_eq!(
            state.reassigned,
            vec![("rentals".to_string(), Some("default".to_string()))]
        );
    }

    #[tokio::test]
    async fn test_delete_without_default_leaves_properties_unassigned() {
        let repo = Arc::new(MockPortfolioRepository::with_portfolios(vec![folder(
            "rentals", USER, None, false,
        )]));
        let service = PortfolioService::new(repo.clone());

        service.delete_portfolio("rentals", USER, None).await.unwrap();

        let state = repo.state.lock().unwrap();
        assert_eq!(state.reassigned, vec![("rentals".to_string(), None)]);
    }

    #[tokio::test]
    async fn test_reparenting_onto_descendant_is_rejected() {
        // a -> b -> c; moving a under c would close the loop
        let repo = Arc::new(MockPortfolioRepository::with_portfolios(vec![
            folder("a", USER, None, false),
            folder("b", USER, Some("a"), false),
            folder("c", USER, Some("b"), false),
        ]));
        let service = PortfolioService::new(repo);

        let update = PortfolioUpdate {
            id: Some("a".to_string()),
            parent_id: Some("c".to_string()),
            ..Default::default()
        };
        let result = service.update_portfolio(update, USER).await;
        assert!(matches!(result, Err(PortfolioError::ParentCycle(_))));
    }

    #[tokio::test]
    async fn test_self_parent_is_rejected() {
        let repo = Arc::new(MockPortfolioRepository::with_portfolios(vec![folder(
            "a", USER, None, false,
        )]));
        let service = PortfolioService::new(repo);

        let update = PortfolioUpdate {
            id: Some("a".to_string()),
            parent_id: Some("a".to_string()),
            ..Default::default()
        };
        let result = service.update_portfolio(update, USER).await;
        assert!(matches!(result, Err(PortfolioError::ParentCycle(_))));
    }

    #[tokio::test]
    async fn test_reparenting_to_sibling_is_allowed() {
        let repo = Arc::new(MockPortfolioRepository::with_portfolios(vec![
            folder("root", USER, None, false),
            folder("a", USER, Some("root"), false),
            folder("b", USER, Some("root"), false),
        ]));
        let service = PortfolioService::new(repo);

        let update = PortfolioUpdate {
            id: Some("a".to_string()),
            parent_id: Some("b".to_string()),
            ..Default::default()
        };
        let updated = service.update_portfolio(update, USER).await.unwrap();
        assert_eq!(updated.parent_id.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_create_with_missing_parent_is_not_found() {
        let repo = Arc::new(MockPortfolioRepository::default());
        let service = PortfolioService::new(repo);

        let new_portfolio = NewPortfolio {
            user_id: USER.to_string(),
            name: "Atlanta".to_string(),
            parent_id: Some("ghost".to_string()),
            ..Default::default()
        };
        let result = service.create_portfolio(new_portfolio).await;
        assert!(matches!(result, Err(PortfolioError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_initialize_default_portfolio_is_idempotent() {
        let repo = Arc::new(MockPortfolioRepository::default());
        let service = PortfolioService::new(repo.clone());

        let first = service.initialize_default_portfolio(USER).await.unwrap();
        assert!(first.is_default);
        assert_eq!(first.name, DEFAULT_FOLDER_NAME);

        let second = service.initialize_default_portfolio(USER).await.unwrap();
        assert_eq!(first.id, second.id);

        let state = repo.state.lock().unwrap();
        assert_eq!(state.portfolios.len(), 1);
        assert_eq!(state.adopted.len(), 1);
    }

    #[tokio::test]
    async fn test_move_property_requires_existing_folder_and_property() {
        let repo = Arc::new(MockPortfolioRepository {
            state: Mutex::new(MockState {
                portfolios: vec![folder("rentals", USER, None, false)],
                ..Default::default()
            }),
            property_ids: vec!["prop-1".to_string()],
        });
        let service = PortfolioService::new(repo.clone());

        service
            .move_property_to_portfolio("prop-1", "rentals", USER)
            .await
            .unwrap();

        let result = service
            .move_property_to_portfolio("ghost-prop", "rentals", USER)
            .await;
        assert!(matches!(result, Err(PortfolioError::NotFound(_))));

        let result = service
            .move_property_to_portfolio("prop-1", "ghost-folder", USER)
            .await;
        assert!(matches!(result, Err(PortfolioError::NotFound(_))));
    }
}
