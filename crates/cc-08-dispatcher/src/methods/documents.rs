//! Document hashes attached to the channel, keyed `(documents, id)`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use cc_05_method_registry::{Args, Check, Context, JsonArg, Method, StringArg};
use shared_types::keys::{create_composite_key, DOCUMENTS_PREFIX};
use shared_types::ContractError;

/// A stored document reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub hash: String,
}

impl Check for Document {
    fn check(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err("document id is empty".into());
        }
        if self.hash.is_empty() {
            return Err(format!("document {} has no hash", self.id));
        }
        Ok(())
    }
}

pub fn methods() -> Vec<Method> {
    vec![
        Method::batched("addDocs", add_docs)
            .with_auth()
            .param(JsonArg::<Vec<Document>>::new()),
        Method::batched("deleteDoc", delete_doc)
            .with_auth()
            .param(StringArg),
        Method::query("documentsList", documents_list).param(JsonArg::<Vec<String>>::new()),
    ]
}

fn document_key(id: &str) -> Result<String, ContractError> {
    Ok(create_composite_key(DOCUMENTS_PREFIX, &[id])?)
}

fn add_docs(ctx: &mut Context<'_>, args: &Args) -> Result<Vec<u8>, ContractError> {
    let docs: Vec<Document> = args.json(0)?;
    for doc in &docs {
        let key = document_key(&doc.id)?;
        if ctx.stub.get_state(&key)?.is_some() {
            return Err(ContractError::business(format!(
                "document {} already exists",
                doc.id
            )));
        }
        let raw = serde_json::to_vec(doc).map_err(|e| ContractError::business(e.to_string()))?;
        ctx.stub.put_state(&key, raw)?;
    }
    debug!(count = docs.len(), "documents added");
    Ok(Vec::new())
}

fn delete_doc(ctx: &mut Context<'_>, args: &Args) -> Result<Vec<u8>, ContractError> {
    let id = args.str(0)?;
    let key = document_key(id)?;
    if ctx.stub.get_state(&key)?.is_none() {
        return Err(ContractError::Loading(format!("document {id} not found")));
    }
    ctx.stub.del_state(&key)?;
    Ok(Vec::new())
}

/// JSON array of the stored documents among `ids`, in request order.
fn documents_list(ctx: &mut Context<'_>, args: &Args) -> Result<Vec<u8>, ContractError> {
    let ids: Vec<String> = args.json(0)?;
    let mut found = Vec::new();
    for id in &ids {
        if let Some(raw) = ctx.stub.get_state(&document_key(id)?)? {
            let doc: Document = serde_json::from_slice(&raw)
                .map_err(|e| ContractError::Loading(format!("document {id}: {e}")))?;
            found.push(doc);
        }
    }
    serde_json::to_vec(&found).map_err(|e| ContractError::business(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cc_01_state_cache::MockLedger;
    use shared_types::{Address, Config, Response, Sender};

    fn call(ledger: &mut MockLedger, tx: &str, name: &str, raw: &str) -> Response {
        let config = Config::default();
        let method = methods().into_iter().find(|m| m.name() == name).unwrap();
        ledger.execute(tx, name, vec![raw.to_string()], |l| {
            let result = method.decode_args(&[raw]).map_err(ContractError::from).and_then(|args| {
                let sender = Some(Sender::new(Address::new([1u8; 32])));
                let mut ctx = Context::new(l, &config, sender);
                method.call(&mut ctx, &args)
            });
            match result {
                Ok(payload) => Response::success(payload),
                Err(e) => Response::error(e.to_string()),
            }
        })
    }

    #[test]
    fn test_add_list_delete() {
        let mut ledger = MockLedger::new("ch", "cc");
        let added = call(&mut ledger, "a1", "addDocs", r#"[{"id":"d1","hash":"h1"},{"id":"d2","hash":"h2"}]"#);
        assert!(added.is_ok(), "{}", added.message);

        let dup = call(&mut ledger, "a2", "addDocs", r#"[{"id":"d1","hash":"x"}]"#);
        assert_eq!(dup.message, "document d1 already exists");

        let listed = call(&mut ledger, "a3", "documentsList", r#"["d2","nope","d1"]"#);
        let docs: Vec<Document> = serde_json::from_slice(&listed.payload).unwrap();
        assert_eq!(
            docs.iter().map(|d| d.id.as_str()).collect::<Vec<_>>(),
            vec!["d2", "d1"]
        );

        assert!(call(&mut ledger, "a4", "deleteDoc", "d1").is_ok());
        assert_eq!(
            call(&mut ledger, "a5", "deleteDoc", "d1").message,
            "document d1 not found"
        );
    }

    #[test]
    fn test_empty_hash_rejected_at_decode() {
        let mut ledger = MockLedger::new("ch", "cc");
        let resp = call(&mut ledger, "a1", "addDocs", r#"[{"id":"d1","hash":""}]"#);
        assert_eq!(resp.message, "invalid argument value: document d1 has no hash");
    }
}
