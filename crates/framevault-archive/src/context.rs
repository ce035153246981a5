//! Archiving and Restore Contexts
//!
//! Context objects thread the caller's transaction handle and the
//! conversation-id mapping through archiver calls. The write-capable handle
//! inside a context is exclusively owned by the calling archiver invocation
//! for its duration; single-writer discipline is the caller's job.
//!
//! Conversation ids are snapshot-local: assigned in first-seen order while
//! archiving, recorded in the restore context while importing. A frame that
//! references a conversation which was never archived is an error
//! ([`ArchiveError::ConversationIdMissing`]), because it would mean the
//! snapshot is internally inconsistent.

use std::collections::HashMap;

use framevault_core::ConversationId;

use crate::error::ArchiveError;
use crate::store::StoreWrite;

/// Context for the archive (export) direction.
pub struct ArchiveContext<'a> {
    store: &'a mut dyn StoreWrite,
    conversation_ids: HashMap<String, ConversationId>,
    next_conversation_id: u64,
}

impl<'a> ArchiveContext<'a> {
    pub fn new(store: &'a mut dyn StoreWrite) -> Self {
        Self {
            store,
            conversation_ids: HashMap::new(),
            next_conversation_id: 0,
        }
    }

    pub fn store(&mut self) -> &mut dyn StoreWrite {
        self.store
    }

    /// Assign (or return the already-assigned) snapshot-local id for a
    /// conversation. Called when the conversation itself is archived.
    pub fn assign_conversation_id(&mut self, conversation_unique_id: &str) -> ConversationId {
        if let Some(&id) = self.conversation_ids.get(conversation_unique_id) {
            return id;
        }
        let id = ConversationId(self.next_conversation_id);
        self.next_conversation_id += 1;
        self.conversation_ids
            .insert(conversation_unique_id.to_string(), id);
        id
    }

    /// Look up the id a conversation should already have from having been
    /// archived.
    pub fn conversation_id_for(
        &self,
        conversation_unique_id: &str,
    ) -> Result<ConversationId, ArchiveError> {
        self.conversation_ids
            .get(conversation_unique_id)
            .copied()
            .ok_or_else(|| ArchiveError::ConversationIdMissing(conversation_unique_id.to_string()))
    }
}

/// Context for the restore (import) direction.
pub struct RestoreContext<'a> {
    store: &'a mut dyn StoreWrite,
    conversations: HashMap<ConversationId, String>,
}

impl<'a> RestoreContext<'a> {
    pub fn new(store: &'a mut dyn StoreWrite) -> Self {
        Self {
            store,
            conversations: HashMap::new(),
        }
    }

    pub fn store(&mut self) -> &mut dyn StoreWrite {
        self.store
    }

    /// Record the conversation a snapshot-local id maps back to. Called
    /// when the conversation frame is restored, before anything that
    /// references it.
    pub fn register_conversation(&mut self, id: ConversationId, conversation_unique_id: String) {
        self.conversations.insert(id, conversation_unique_id);
    }

    pub fn conversation_for(&self, id: ConversationId) -> Result<&str, ArchiveError> {
        self.conversations
            .get(&id)
            .map(String::as_str)
            .ok_or_else(|| ArchiveError::ConversationIdMissing(id.to_string()))
    }
}
