//! Intent-specific retrieval over the vector store.
//!
//! Each intent runs a fixed sequence of filtered searches. A later search is
//! only issued when an earlier one either produced something to build on
//! (the project to employee join) or came back empty and a more relaxed
//! pass remains (the generic priority chain).

use crate::document::{Document, DocumentType, MetadataField};
use crate::extract::Entities;
use crate::filter::Filter;
use crate::intent::{is_staffing_question, Intent};
use crate::normalize::normalize;
use crate::rewrite::rewrite;
use crate::store::{SearchRequest, VectorStore};
use hrdesk_core::AppResult;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Definitive "nothing to answer from" outcomes, each with its own reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    /// Shared no-data reply
    NoData,
    NamedEmployeeNotFound(String),
    /// Stage 1 of a project lookup matched nothing
    ProjectNotFound,
    /// A project matched but nobody is assigned to it
    NoEmployeesForProject,
    NoLeaveRequests,
    NoLeaveRequestsForEmployee(String),
    /// Identity-scoped leave query with nothing pending for the caller
    NoOwnLeaveRequests,
    /// Identity-scoped chat for an employee id that is not indexed
    EmployeeProfileMissing,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalOutcome {
    /// Non-empty, similarity-ordered, capped to top-K
    Documents(Vec<Document>),
    Terminal(Terminal),
}

impl RetrievalOutcome {
    fn from_docs(docs: Vec<Document>, when_empty: Terminal) -> Self {
        if docs.is_empty() {
            Self::Terminal(when_empty)
        } else {
            Self::Documents(docs)
        }
    }
}

/// The employee a chat request is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// `employee:<id>`
    pub entity_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeSettings {
    pub top_k: usize,
    /// Initial employee pool of the project to employee join, doubled
    /// while it comes back full without `top_k` matches
    pub join_candidates: usize,
}

impl Default for CascadeSettings {
    fn default() -> Self {
        Self {
            top_k: 5,
            join_candidates: 50,
        }
    }
}

pub struct RetrievalCascade {
    store: Arc<dyn VectorStore>,
    settings: CascadeSettings,
}

impl RetrievalCascade {
    pub fn new(store: Arc<dyn VectorStore>, settings: CascadeSettings) -> Self {
        Self { store, settings }
    }

    /// Run the cascade for a retrieval intent.
    ///
    /// `SMALL_TALK` and `AGGREGATION` never reach the store and resolve to
    /// [`Terminal::NoData`] here; the pipeline answers them before retrieval.
    pub async fn retrieve(
        &self,
        intent: Intent,
        message: &str,
        caller: Option<&Caller>,
    ) -> AppResult<RetrievalOutcome> {
        let entities = Entities::extract(message);
        let query = rewrite(message);
        debug!(%intent, ?entities, "Running retrieval cascade");

        match intent {
            Intent::LeaveRequest => self.leave_requests(&query, &entities, caller).await,
            Intent::Project => self.projects(message, &query, &entities).await,
            Intent::EmployeeByProject => self.employees_by_project(&query, &entities).await,
            Intent::Generic => self.generic(&query, &entities, caller).await,
            Intent::SmallTalk | Intent::Aggregation => {
                Ok(RetrievalOutcome::Terminal(Terminal::NoData))
            }
        }
    }

    /// Look up the caller's own employee document.
    pub async fn resolve_caller(&self, employee_id: &str) -> AppResult<Option<Caller>> {
        let entity_id = format!("{}:{}", DocumentType::Employee.id_prefix(), employee_id.trim());
        let filter =
            Filter::of_type(DocumentType::Employee).and(MetadataField::EntityId, &entity_id);

        let docs = self.search(&entity_id, Some(filter), 1).await?;
        Ok(docs.into_iter().next().and_then(|doc| {
            doc.metadata.get(MetadataField::Name).map(|name| Caller {
                entity_id: doc.metadata.entity_id.clone(),
                name: name.to_string(),
            })
        }))
    }

    async fn search(
        &self,
        query: &str,
        filter: Option<Filter>,
        top_k: usize,
    ) -> AppResult<Vec<Document>> {
        let mut request = SearchRequest::new(query, top_k);
        if let Some(filter) = filter {
            request = request.with_filter(filter);
        }
        self.store.similarity_search(&request).await
    }

    /// Try each pass in order and return the first non-empty result.
    async fn first_non_empty(
        &self,
        query: &str,
        passes: Vec<Option<Filter>>,
    ) -> AppResult<Vec<Document>> {
        let total = passes.len();
        for (i, filter) in passes.into_iter().enumerate() {
            let label = filter
                .as_ref()
                .map(|f| f.to_string())
                .unwrap_or_else(|| "unfiltered".to_string());

            let docs = self.search(query, filter, self.settings.top_k).await?;
            info!(pass = i + 1, of = total, filter = %label, hits = docs.len(), "Search pass");

            if !docs.is_empty() {
                return Ok(docs);
            }
        }
        Ok(Vec::new())
    }

    async fn leave_requests(
        &self,
        query: &str,
        entities: &Entities,
        caller: Option<&Caller>,
    ) -> AppResult<RetrievalOutcome> {
        let named = entities.employee_name.as_deref();
        let employee = named.or(caller.map(|c| c.name.as_str()));

        let filter = Filter::of_type(DocumentType::LeaveRequest)
            .and_opt(MetadataField::EmployeeName, employee);
        let docs = self.first_non_empty(query, vec![Some(filter)]).await?;

        let when_empty = match (named, caller) {
            (Some(name), _) => Terminal::NoLeaveRequestsForEmployee(name.to_string()),
            (None, Some(_)) => Terminal::NoOwnLeaveRequests,
            (None, None) => Terminal::NoLeaveRequests,
        };
        Ok(RetrievalOutcome::from_docs(docs, when_empty))
    }

    fn project_filter(entities: &Entities) -> Filter {
        Filter::of_type(DocumentType::Project)
            .and_opt(MetadataField::ProjectName, entities.project_name.as_deref())
            .and_opt(MetadataField::Ubication, entities.project_location.as_deref())
            .and_opt(MetadataField::Client, entities.client.as_deref())
            .and_opt(MetadataField::Code, entities.project_code.as_deref())
    }

    async fn projects(
        &self,
        message: &str,
        query: &str,
        entities: &Entities,
    ) -> AppResult<RetrievalOutcome> {
        if !entities.has_project_filters() {
            info!("No project qualifiers; listing projects");
            let docs = self
                .first_non_empty(query, vec![Some(Filter::of_type(DocumentType::Project))])
                .await?;
            return Ok(RetrievalOutcome::from_docs(docs, Terminal::ProjectNotFound));
        }

        let projects = self
            .first_non_empty(query, vec![Some(Self::project_filter(entities))])
            .await?;
        if projects.is_empty() {
            return Ok(RetrievalOutcome::Terminal(Terminal::ProjectNotFound));
        }

        if is_staffing_question(message) {
            info!(projects = projects.len(), "Staffing question; joining employees");
            return self.join_employees(query, &projects).await;
        }

        Ok(RetrievalOutcome::Documents(projects))
    }

    async fn employees_by_project(
        &self,
        query: &str,
        entities: &Entities,
    ) -> AppResult<RetrievalOutcome> {
        if !entities.has_project_filters() {
            info!("No project qualifiers for employee lookup");
            return Ok(RetrievalOutcome::Terminal(Terminal::NoData));
        }

        let projects = self
            .first_non_empty(query, vec![Some(Self::project_filter(entities))])
            .await?;
        if projects.is_empty() {
            return Ok(RetrievalOutcome::Terminal(Terminal::ProjectNotFound));
        }

        self.join_employees(query, &projects).await
    }

    /// Stage 2 of the project join: employees whose `projects` metadata
    /// names one of the matched projects.
    async fn join_employees(
        &self,
        query: &str,
        projects: &[Document],
    ) -> AppResult<RetrievalOutcome> {
        let canonical_names: BTreeSet<String> = projects
            .iter()
            .filter_map(|doc| doc.metadata.get(MetadataField::ProjectName))
            .map(normalize)
            .collect();
        debug!(?canonical_names, "Matched projects");

        let mut pool = self.settings.join_candidates.max(1);
        let employees = loop {
            let candidates = self
                .search(query, Some(Filter::of_type(DocumentType::Employee)), pool)
                .await?;
            let saturated = candidates.len() == pool;

            let assigned: Vec<Document> = candidates
                .into_iter()
                .filter(|doc| {
                    doc.metadata
                        .projects()
                        .iter()
                        .any(|p| canonical_names.contains(&normalize(&p.name)))
                })
                .take(self.settings.top_k)
                .collect();

            if !saturated || assigned.len() >= self.settings.top_k {
                break assigned;
            }
            warn!(
                pool,
                assigned = assigned.len(),
                "Employee candidate pool exhausted before top-k; widening the join"
            );
            pool = pool.saturating_mul(2);
        };

        info!(employees = employees.len(), "Joined employees to projects");
        Ok(RetrievalOutcome::from_docs(
            employees,
            Terminal::NoEmployeesForProject,
        ))
    }

    async fn generic(
        &self,
        query: &str,
        entities: &Entities,
        caller: Option<&Caller>,
    ) -> AppResult<RetrievalOutcome> {
        let employees = || Filter::of_type(DocumentType::Employee);

        if let Some(name) = &entities.employee_name {
            let docs = self
                .first_non_empty(query, vec![Some(employees().and(MetadataField::Name, name))])
                .await?;
            return Ok(RetrievalOutcome::from_docs(
                docs,
                Terminal::NamedEmployeeNotFound(name.clone()),
            ));
        }

        if let Some(caller) = caller {
            let docs = self
                .first_non_empty(
                    query,
                    vec![Some(employees().and(MetadataField::EntityId, &caller.entity_id))],
                )
                .await?;
            return Ok(RetrievalOutcome::from_docs(docs, Terminal::EmployeeProfileMissing));
        }

        let location = entities.employee_location.as_deref();
        let department = entities.department.as_deref();

        let passes = match (location, department) {
            (Some(location), Some(department)) => vec![
                Some(
                    employees()
                        .and(MetadataField::Department, department)
                        .and(MetadataField::Location, location),
                ),
                Some(employees().and(MetadataField::Location, location)),
            ],
            (Some(location), None) => {
                vec![Some(employees().and(MetadataField::Location, location))]
            }
            (None, Some(department)) => vec![
                Some(employees().and(MetadataField::Department, department)),
                None,
            ],
            (None, None) => vec![None],
        };

        let docs = self.first_non_empty(query, passes).await?;
        Ok(RetrievalOutcome::from_docs(docs, Terminal::NoData))
    }
}
