use anyhow::{Context, Result};
use chrono::Utc;

use super::record_store::RecordStore;
use crate::models::document::{detect_link_type, AddDocumentPayload, DocType, Document};
use crate::models::exam::Grade;
use crate::utils::ids::next_id;

pub const DOCUMENTS_COLLECTION: &str = "documents";

pub struct DocumentService<'a> {
    store: &'a RecordStore,
}

impl<'a> DocumentService<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    pub fn list(&self, grade: Option<Grade>, doc_type: Option<DocType>) -> Vec<Document> {
        self.store
            .load_or_default::<Document>(DOCUMENTS_COLLECTION)
            .into_iter()
            .filter(|doc| grade.is_none_or(|g| doc.grade == g))
            .filter(|doc| doc_type.is_none_or(|t| doc.doc_type == t))
            .collect()
    }

    pub fn add(&self, payload: AddDocumentPayload, grade: Grade, doc_type: DocType) -> Result<Document> {
        let mut documents: Vec<Document> = self.store.load_or_default(DOCUMENTS_COLLECTION);
        let id = next_id("doc", documents.iter().map(|doc| doc.id.as_str()));

        let document = Document {
            id,
            title: payload.title,
            grade,
            doc_type,
            link_type: detect_link_type(&payload.url).to_string(),
            url: payload.url,
            description: payload.description,
            created_at: Utc::now().to_rfc3339(),
        };

        documents.push(document.clone());
        self.store
            .save(DOCUMENTS_COLLECTION, &documents)
            .context("failed to persist document")?;

        tracing::info!("Document {} added for grade {}", document.id, grade);
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> RecordStore {
        let dir = std::env::temp_dir().join(format!("docs-{}", uuid::Uuid::new_v4()));
        RecordStore::new(dir)
    }

    fn payload(title: &str, url: &str) -> AddDocumentPayload {
        AddDocumentPayload {
            title: title.to_string(),
            url: url.to_string(),
            grade: "10".to_string(),
            doc_type: "lecture".to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn add_detects_link_type_and_filters_apply() {
        let store = temp_store();
        let docs = DocumentService::new(&store);

        let video = docs
            .add(
                payload("Intro", "https://youtu.be/abc"),
                Grade::Ten,
                DocType::Lecture,
            )
            .unwrap();
        assert_eq!(video.link_type, "youtube");

        docs.add(
            payload("Notes", "https://example.com/notes.pdf"),
            Grade::Eleven,
            DocType::Document,
        )
        .unwrap();

        assert_eq!(docs.list(None, None).len(), 2);
        assert_eq!(docs.list(Some(Grade::Ten), None).len(), 1);
        assert_eq!(docs.list(Some(Grade::Ten), Some(DocType::Document)).len(), 0);
        assert_eq!(
            docs.list(Some(Grade::Eleven), Some(DocType::Document)).len(),
            1
        );
    }
}
