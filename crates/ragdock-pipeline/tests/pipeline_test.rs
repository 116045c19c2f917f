//! End-to-end pipeline tests against the in-memory service implementations.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use ragdock_core::{Error, IndexDocument, RagConfig, Result, Workspace, WorkspaceFile};
use ragdock_pipeline::{
    format_documents_context, IngestQueue, IngestStatus, MemoryWorkspaceStore, RagServices,
    ReconciliationJob,
};
use ragdock_search::{
    DocumentStatus, IndexDefinition, MemorySearchBackend, QueryRequest, SearchBackend, SearchHit,
};
use ragdock_storage::MemoryObjectStore;

fn finance_workspace() -> Workspace {
    Workspace::new("abc1234xyz", "Finance")
}

fn workspace_file(id: &str, name: &str, workspace: &Workspace) -> WorkspaceFile {
    WorkspaceFile {
        id: id.into(),
        original_name: name.into(),
        stored_name: name.into(),
        mime_type: "text/plain".into(),
        size: 64,
        workspace_id: workspace.id.clone(),
        uploaded_by: "analyst".into(),
        uploaded_at: Utc::now(),
    }
}

struct Harness {
    services: RagServices,
    blobs: Arc<MemoryObjectStore>,
    search: Arc<MemorySearchBackend>,
}

fn harness() -> Harness {
    let blobs = Arc::new(MemoryObjectStore::new());
    let search = Arc::new(MemorySearchBackend::new());
    let services =
        RagServices::in_memory_with(RagConfig::in_memory(), blobs.clone(), search.clone());
    Harness {
        services,
        blobs,
        search,
    }
}

fn seed_blob(harness: &Harness, workspace: &Workspace, file: &WorkspaceFile, content: &str) {
    let folder = workspace.identifiers().folder_path;
    harness.blobs.put(
        &format!("{folder}{}", file.stored_name),
        "documents",
        content.as_bytes().to_vec(),
    );
}

#[tokio::test]
async fn upload_to_search_round_trip() -> anyhow::Result<()> {
    let harness = harness();
    let workspace = finance_workspace();
    let file = workspace_file("file-001", "report.txt", &workspace);
    seed_blob(
        &harness,
        &workspace,
        &file,
        "Q3 revenue grew 12% quarter over quarter, driven by subscriptions.",
    );

    let pipeline = Arc::new(harness.services.pipeline());
    let queue = IngestQueue::start_with_settle(pipeline, Duration::ZERO);

    let job_id = queue.enqueue(workspace.clone(), file.clone());
    let job = queue.wait(&job_id).await.expect("job should be known");
    assert_eq!(job.status, IngestStatus::Completed);
    assert_eq!(job.attempts, 1);

    // The workspace index was created on demand and holds one document
    // keyed by the file id.
    assert_eq!(harness.search.document_count("finance-abc1234index"), 1);

    let retrieval = harness.services.retrieval();
    let results = retrieval
        .get_relevant_documents("Q3 revenue", Some(&workspace.id), &workspace.name)
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].document.id, "file-001");
    assert!(results[0].score > 0.0);
    assert!(results[0].document.content.contains("Q3 revenue"));
    assert!(!results[0].document.summary.is_empty());

    let context = format_documents_context(&results);
    assert!(context.contains("File Name: report.txt"));
    assert!(context.contains("File Type: text/plain"));
    Ok(())
}

#[tokio::test]
async fn reindexing_a_file_overwrites_its_document() -> anyhow::Result<()> {
    let harness = harness();
    let workspace = finance_workspace();
    let file = workspace_file("file-001", "report.txt", &workspace);

    let pipeline = Arc::new(harness.services.pipeline());
    let queue = IngestQueue::start_with_settle(pipeline, Duration::ZERO);

    seed_blob(&harness, &workspace, &file, "first draft of the report");
    let first = queue.enqueue(workspace.clone(), file.clone());
    assert_eq!(
        queue.wait(&first).await.unwrap().status,
        IngestStatus::Completed
    );

    seed_blob(&harness, &workspace, &file, "final numbers for the quarter");
    let second = queue.enqueue(workspace.clone(), file.clone());
    assert_eq!(
        queue.wait(&second).await.unwrap().status,
        IngestStatus::Completed
    );

    assert_eq!(harness.search.document_count("finance-abc1234index"), 1);

    let results = harness
        .services
        .retrieval()
        .get_relevant_documents("final numbers", Some(&workspace.id), &workspace.name)
        .await;
    assert_eq!(results.len(), 1);
    assert!(results[0].document.content.contains("final numbers"));
    Ok(())
}

#[tokio::test]
async fn reconciliation_rebuilds_a_deleted_index() -> anyhow::Result<()> {
    let harness = harness();
    let workspace = finance_workspace();
    let store = Arc::new(MemoryWorkspaceStore::new());
    store.add_workspace(workspace.clone());

    // Seven indexable files (two batches: 5 + 2) plus one legacy .doc that
    // extraction cannot handle and reconciliation must skip.
    for i in 0..7 {
        let file = workspace_file(&format!("file-{i:03}"), &format!("notes-{i}.txt"), &workspace);
        seed_blob(&harness, &workspace, &file, &format!("budget notes number {i}"));
        store.add_file(file);
    }
    let legacy = workspace_file("file-doc", "old.doc", &workspace);
    seed_blob(&harness, &workspace, &legacy, "binary blob");
    store.add_file(legacy);

    let pipeline = Arc::new(harness.services.pipeline());
    let job = ReconciliationJob::new(store.clone(), pipeline);

    assert!(job.reconcile(&workspace.id).await);
    assert_eq!(harness.search.document_count("finance-abc1234index"), 7);

    // Drop the index, reconcile again: the sweep recreates and refills it.
    harness.search.delete_index("finance-abc1234index").await?;
    assert!(job.reconcile(&workspace.id).await);
    assert_eq!(harness.search.document_count("finance-abc1234index"), 7);
    Ok(())
}

#[tokio::test]
async fn reconciliation_of_unknown_workspace_fails() {
    let harness = harness();
    let store = Arc::new(MemoryWorkspaceStore::new());
    let pipeline = Arc::new(harness.services.pipeline());
    let job = ReconciliationJob::new(store, pipeline);

    assert!(!job.reconcile("no-such-workspace").await);
}

/// A search backend whose uploads always fail, for exercising the queue's
/// retry and dead-letter path.
struct RejectingUploads {
    inner: MemorySearchBackend,
}

#[async_trait]
impl SearchBackend for RejectingUploads {
    async fn list_index_names(&self) -> Result<Vec<String>> {
        self.inner.list_index_names().await
    }

    async fn create_index(&self, definition: &IndexDefinition) -> Result<()> {
        self.inner.create_index(definition).await
    }

    async fn delete_index(&self, name: &str) -> Result<()> {
        self.inner.delete_index(name).await
    }

    async fn upload_documents(
        &self,
        _index_name: &str,
        _documents: &[IndexDocument],
    ) -> Result<Vec<DocumentStatus>> {
        Err(Error::Search("service unavailable".into()))
    }

    async fn query(&self, index_name: &str, request: &QueryRequest) -> Result<Vec<SearchHit>> {
        self.inner.query(index_name, request).await
    }
}

#[tokio::test]
async fn failing_uploads_exhaust_retries_and_dead_letter() -> anyhow::Result<()> {
    let blobs = Arc::new(MemoryObjectStore::new());
    let search = Arc::new(MemorySearchBackend::new());
    let mut services =
        RagServices::in_memory_with(RagConfig::in_memory(), blobs.clone(), search.clone());
    services.search = Arc::new(RejectingUploads {
        inner: MemorySearchBackend::new(),
    });

    let workspace = finance_workspace();
    let file = workspace_file("file-001", "report.txt", &workspace);
    let folder = workspace.identifiers().folder_path;
    blobs.put(
        &format!("{folder}{}", file.stored_name),
        "documents",
        b"content".to_vec(),
    );

    let pipeline = Arc::new(services.pipeline());
    let queue = IngestQueue::start_with_settle(pipeline, Duration::ZERO);

    let job_id = queue.enqueue(workspace, file);
    let job = queue.wait(&job_id).await.expect("job should be known");

    assert_eq!(job.status, IngestStatus::Dead);
    assert_eq!(job.attempts, 3);
    assert!(job.error.is_some());
    assert_eq!(queue.dead_letter().len(), 1);
    Ok(())
}

/// A backend that panics on any use, proving general mode never touches the
/// search service.
struct UnreachableBackend;

#[async_trait]
impl SearchBackend for UnreachableBackend {
    async fn list_index_names(&self) -> Result<Vec<String>> {
        unreachable!("general mode must not call the search service")
    }

    async fn create_index(&self, _definition: &IndexDefinition) -> Result<()> {
        unreachable!("general mode must not call the search service")
    }

    async fn delete_index(&self, _name: &str) -> Result<()> {
        unreachable!("general mode must not call the search service")
    }

    async fn upload_documents(
        &self,
        _index_name: &str,
        _documents: &[IndexDocument],
    ) -> Result<Vec<DocumentStatus>> {
        unreachable!("general mode must not call the search service")
    }

    async fn query(&self, _index_name: &str, _request: &QueryRequest) -> Result<Vec<SearchHit>> {
        unreachable!("general mode must not call the search service")
    }
}

#[tokio::test]
async fn general_mode_makes_no_search_calls() {
    let retrieval = ragdock_pipeline::DocumentRetrieval::new(Arc::new(UnreachableBackend));
    let results = retrieval
        .get_relevant_documents("anything", None, "Finance")
        .await;
    assert!(results.is_empty());
}
