//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use hrdesk_core::{AppError, AppResult};
use hrdesk_knowledge::document::{
    employee_document, leave_request_document, project_document, EmployeeRecord,
    LeaveRequestRecord, ProjectRecord,
};
use hrdesk_knowledge::embeddings::TrigramProvider;
use hrdesk_knowledge::{
    AnswerGenerator, CascadeSettings, ChatPipeline, Document, InMemoryVectorStore,
    RetrievalCascade, SearchRequest, VectorStore,
};
use hrdesk_llm::{LlmClient, LlmRequest, LlmResponse};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Wraps a real in-memory store and records every search filter.
pub struct RecordingStore {
    inner: InMemoryVectorStore,
    pub searches: Mutex<Vec<Option<String>>>,
}

impl RecordingStore {
    pub async fn with(documents: Vec<Document>) -> Arc<Self> {
        let inner = InMemoryVectorStore::new(Arc::new(TrigramProvider::new(384)));
        inner.add(documents).await.unwrap();
        Arc::new(Self {
            inner,
            searches: Mutex::new(Vec::new()),
        })
    }

    pub fn search_count(&self) -> usize {
        self.searches.lock().unwrap().len()
    }
}

#[async_trait]
impl VectorStore for RecordingStore {
    async fn add(&self, documents: Vec<Document>) -> AppResult<()> {
        self.inner.add(documents).await
    }

    async fn delete(&self, ids: &[String]) -> AppResult<()> {
        self.inner.delete(ids).await
    }

    async fn replace(&self, document: Document) -> AppResult<()> {
        self.inner.replace(document).await
    }

    async fn ids_from_source(&self, source: &str) -> AppResult<Vec<String>> {
        self.inner.ids_from_source(source).await
    }

    async fn similarity_search(&self, request: &SearchRequest) -> AppResult<Vec<Document>> {
        self.searches
            .lock()
            .unwrap()
            .push(request.filter.as_ref().map(|f| f.to_string()));
        self.inner.similarity_search(request).await
    }

    async fn len(&self) -> AppResult<usize> {
        self.inner.len().await
    }
}

/// Returns queued results in order, one per search, then empty results.
pub struct ScriptedStore {
    results: Mutex<VecDeque<Vec<Document>>>,
    pub searches: Mutex<Vec<Option<String>>>,
}

impl ScriptedStore {
    pub fn new(results: Vec<Vec<Document>>) -> Arc<Self> {
        Arc::new(Self {
            results: Mutex::new(results.into()),
            searches: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl VectorStore for ScriptedStore {
    async fn add(&self, _documents: Vec<Document>) -> AppResult<()> {
        Ok(())
    }

    async fn delete(&self, _ids: &[String]) -> AppResult<()> {
        Ok(())
    }

    async fn ids_from_source(&self, _source: &str) -> AppResult<Vec<String>> {
        Ok(Vec::new())
    }

    async fn similarity_search(&self, request: &SearchRequest) -> AppResult<Vec<Document>> {
        self.searches
            .lock()
            .unwrap()
            .push(request.filter.as_ref().map(|f| f.to_string()));
        Ok(self.results.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn len(&self) -> AppResult<usize> {
        Ok(0)
    }
}

/// Store whose every call fails, as a dropped connection would.
pub struct BrokenStore;

#[async_trait]
impl VectorStore for BrokenStore {
    async fn add(&self, _documents: Vec<Document>) -> AppResult<()> {
        Err(AppError::Index("store offline".to_string()))
    }

    async fn delete(&self, _ids: &[String]) -> AppResult<()> {
        Err(AppError::Index("store offline".to_string()))
    }

    async fn ids_from_source(&self, _source: &str) -> AppResult<Vec<String>> {
        Err(AppError::Index("store offline".to_string()))
    }

    async fn similarity_search(&self, _request: &SearchRequest) -> AppResult<Vec<Document>> {
        Err(AppError::Index("store offline".to_string()))
    }

    async fn len(&self) -> AppResult<usize> {
        Err(AppError::Index("store offline".to_string()))
    }
}

/// Generation client answering with a fixed text and recording requests.
pub struct ScriptedLlm {
    answer: Option<String>,
    pub requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedLlm {
    pub fn answering(answer: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(answer.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            answer: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> String {
        self.requests
            .lock()
            .unwrap()
            .last()
            .map(|r| r.prompt.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.answer {
            Some(answer) => Ok(LlmResponse {
                content: answer.clone(),
                model: request.model.clone(),
                usage: Default::default(),
            }),
            None => Err(AppError::Llm("model unavailable".to_string())),
        }
    }
}

pub fn pipeline(store: Arc<dyn VectorStore>, llm: Arc<ScriptedLlm>) -> ChatPipeline {
    let prompt = hrdesk_prompt::default_answer_prompt().unwrap();
    ChatPipeline::new(
        RetrievalCascade::new(store, CascadeSettings::default()),
        AnswerGenerator::new(llm, prompt, "llama3.2"),
    )
}

pub fn portal_web() -> ProjectRecord {
    ProjectRecord {
        code: "PRJ003".to_string(),
        name: "Portal Web Corporativo".to_string(),
        client: "Nike".to_string(),
        ubication: "Madrid".to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 10),
        end_date: None,
    }
}

pub fn employee(id: i64, name: &str, department: &str, projects: Vec<ProjectRecord>) -> EmployeeRecord {
    EmployeeRecord {
        id,
        name: name.to_string(),
        email: None,
        location: "Madrid".to_string(),
        hire_date: NaiveDate::from_ymd_opt(2021, 3, 15),
        department: department.to_string(),
        job_position: "Backend Developer".to_string(),
        skills: vec!["Java".to_string(), "Docker".to_string()],
        projects,
        contract_type: Some("PERMANENT".to_string()),
        weekly_hours: Some(40),
        contract_start_date: None,
        contract_end_date: None,
        base_salary: Some(42000.0),
        bonus: None,
        leave_requests: Vec::new(),
    }
}

pub fn vacation(employee_name: &str) -> LeaveRequestRecord {
    LeaveRequestRecord {
        employee_name: employee_name.to_string(),
        status: "PENDING".to_string(),
        leave_type: "VACATION".to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 8, 15),
        comments: None,
    }
}

/// A small company: Ana on Portal Web, Luis unassigned with a pending vacation.
pub fn company_documents() -> Vec<Document> {
    vec![
        project_document(&portal_web()),
        employee_document(&employee(1, "Ana Pérez", "Desarrollo", vec![portal_web()])),
        employee_document(&employee(2, "Luis Gómez", "Data", Vec::new())),
        leave_request_document(&vacation("Luis Gómez")),
    ]
}
