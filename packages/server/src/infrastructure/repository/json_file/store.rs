//! Chat store backed by a single JSON file.
//!
//! The whole document is mirrored in memory and rewritten on every mutation.
//! A single mutex over the document serializes mutations, so two appends can
//! never interleave their read-modify-write of the file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tsudoi_shared::time::get_timestamp_millis;

use super::document::{ChatDocument, MessageRecord, UserRecord};
use crate::domain::{
    ChannelId, ChatRepository, Message, NewMessage, RepositoryError, User, UserId,
    next_message_id,
};

pub struct JsonFileChatRepository {
    path: PathBuf,
    document: Mutex<ChatDocument>,
}

impl JsonFileChatRepository {
    /// Load the document at `path`.
    ///
    /// A missing, unreadable or unparsable file is replaced by the initial
    /// document, which is written immediately. An existing file that could
    /// not be read is first renamed to `<name>.<millis>.bak`; if that rename
    /// fails nothing is overwritten and the error is returned.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();

        let document = match read_document(&path).await {
            Ok(document) => {
                tracing::info!(
                    "Loaded chat data from {} ({} users, {} channels, {} messages)",
                    path.display(),
                    document.users.len(),
                    document.channels.len(),
                    document.messages.len()
                );
                document
            }
            Err(e) => {
                tracing::warn!(
                    "Could not load chat data from {} ({}); initializing defaults",
                    path.display(),
                    e
                );
                if let Some(backup) = set_aside(&path).await? {
                    tracing::warn!(
                        "Moved unreadable chat data to {}",
                        backup.display()
                    );
                }
                let document = ChatDocument::initial();
                write_document(&path, &document).await?;
                document
            }
        };

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current in-memory document
    #[cfg(test)]
    pub async fn snapshot(&self) -> ChatDocument {
        self.document.lock().await.clone()
    }

    /// Register a user. The id is one past the highest existing id and the
    /// role defaults to `User`.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        roles: Vec<String>,
    ) -> Result<User, RepositoryError> {
        let mut document = self.document.lock().await;

        if document.users.iter().any(|user| user.username == username) {
            return Err(RepositoryError::DuplicateUsername(username.to_string()));
        }

        let id = document.users.iter().map(|user| user.id).max().unwrap_or(0) + 1;
        let roles = if roles.is_empty() {
            vec!["User".to_string()]
        } else {
            roles
        };
        let record = UserRecord {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            roles,
            groups: Vec::new(),
            extra: Default::default(),
        };
        let user = User::try_from(&record)?;

        document.users.push(record);
        if let Err(e) = write_document(&self.path, &document).await {
            document.users.pop();
            return Err(e);
        }

        tracing::info!("Created user '{}' with id {}", username, id);
        Ok(user)
    }
}

#[async_trait]
impl ChatRepository for JsonFileChatRepository {
    async fn append_message(&self, message: NewMessage) -> Result<Message, RepositoryError> {
        let mut document = self.document.lock().await;

        let last_id = document.messages.iter().map(|m| m.id).max();
        let id = next_message_id(last_id, message.timestamp);
        let message = Message::from_new(id, message);

        document.messages.push(MessageRecord::from(&message));
        if let Err(e) = write_document(&self.path, &document).await {
            document.messages.pop();
            tracing::error!("Failed to persist message {}: {}", id, e);
            return Err(e);
        }

        Ok(message)
    }

    async fn get_channel_messages(&self, channel_id: ChannelId) -> Vec<Message> {
        let document = self.document.lock().await;
        document
            .messages
            .iter()
            .filter(|record| record.channel_id == Some(channel_id.value()))
            .filter_map(MessageRecord::to_message)
            .collect()
    }

    async fn find_user(&self, user_id: UserId) -> Option<User> {
        let document = self.document.lock().await;
        document
            .users
            .iter()
            .find(|user| user.id == user_id.value())
            .and_then(|record| User::try_from(record).ok())
    }
}

async fn read_document(path: &Path) -> Result<ChatDocument, RepositoryError> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Rename an existing file at `path` out of the way. `None` when there is
/// nothing there.
async fn set_aside(path: &Path) -> Result<Option<PathBuf>, RepositoryError> {
    if tokio::fs::symlink_metadata(path).await.is_err() {
        return Ok(None);
    }

    let mut backup_name = path.file_name().unwrap_or_default().to_os_string();
    backup_name.push(format!(".{}.bak", get_timestamp_millis()));
    let backup = path.with_file_name(backup_name);

    tokio::fs::rename(path, &backup).await?;
    Ok(Some(backup))
}

/// Rewrite the whole document: write a sibling temporary file, then rename it
/// over the target.
async fn write_document(path: &Path, document: &ChatDocument) -> Result<(), RepositoryError> {
    let mut json = serde_json::to_string_pretty(document)?;
    json.push('\n');

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    tokio::fs::write(&tmp_path, json.as_bytes()).await?;
    tokio::fs::rename(&tmp_path, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageContent, Timestamp, Username};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - JsonFileChatRepository の読み込み・初期化・追記・検索
    //
    // 【なぜこのテストが必要か】
    // - Store は全メッセージ履歴を保持する唯一の共有資源
    // - ファイルとメモリの内容が一致していることを保証する必要がある
    //
    // 【どのようなシナリオをテストするか】
    // 1. ファイルが無い・壊れている場合の初期化 (壊れたファイルは退避)
    // 2. 以前のサーバーが書いた緩い形式のファイルを失わずに読み込む
    // 3. 追記後の再読み込みで履歴が復元される
    // 4. 書き込み失敗時にメモリ上の追記が取り消される
    // 5. 同時追記でも ID が単調増加し、欠落しない
    // ========================================

    fn backup_files(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "bak"))
            .collect()
    }

    fn new_message(channel: i64, content: &str, timestamp: i64) -> NewMessage {
        NewMessage {
            channel_id: ChannelId::new(channel),
            user_id: UserId::new(1),
            username: Username::new("super".to_string()).unwrap(),
            content: MessageContent::new(content.to_string()).unwrap(),
            timestamp: Timestamp::new(timestamp),
        }
    }

    #[tokio::test]
    async fn test_load_missing_file_writes_initial_document() {
        // テスト項目: ファイルが無い場合は初期ドキュメントが作成・保存される
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("chat_data.json");

        // when (操作):
        let repo = JsonFileChatRepository::load(&path).await.unwrap();

        // then (期待する結果):
        assert!(path.exists());
        let on_disk: ChatDocument =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk, ChatDocument::initial());

        let admin = repo.find_user(UserId::new(1)).await.unwrap();
        assert_eq!(admin.username.as_str(), "super");
        assert_eq!(admin.roles, vec!["Super Admin".to_string()]);
    }

    #[tokio::test]
    async fn test_load_corrupt_file_is_reinitialized() {
        // テスト項目: 壊れたファイルは初期ドキュメントで置き換えられる
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat_data.json");
        std::fs::write(&path, "{ not json").unwrap();

        // when (操作):
        let repo = JsonFileChatRepository::load(&path).await.unwrap();

        // then (期待する結果): 元のファイルは .bak として残る
        assert_eq!(repo.snapshot().await, ChatDocument::initial());
        let backups = backup_files(dir.path());
        assert_eq!(backups.len(), 1);
        assert_eq!(std::fs::read_to_string(&backups[0]).unwrap(), "{ not json");
    }

    #[tokio::test]
    async fn test_load_with_wrong_shape_keeps_old_file_aside() {
        // テスト項目: 想定外の構造のファイルも初期化前に退避され、内容が失われない
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat_data.json");
        let original = r#"{"users": "alice", "messages": []}"#;
        std::fs::write(&path, original).unwrap();

        // when (操作):
        JsonFileChatRepository::load(&path).await.unwrap();

        // then (期待する結果):
        let backups = backup_files(dir.path());
        assert_eq!(backups.len(), 1);
        assert_eq!(std::fs::read_to_string(&backups[0]).unwrap(), original);
        let on_disk: ChatDocument =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk, ChatDocument::initial());
    }

    #[tokio::test]
    async fn test_load_keeps_data_written_by_earlier_servers() {
        // テスト項目: userId が null・content が無いメッセージを含む既存ファイルでも
        //             ユーザーや履歴が失われない
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat_data.json");
        std::fs::write(
            &path,
            r#"{
  "users": [
    {"id": 1, "username": "super", "email": "super@admin.com", "password": "123", "roles": ["Super Admin"], "groups": []},
    {"id": 2, "username": "alice", "email": "alice@example.com", "password": "pw", "roles": ["User"], "groups": [1]}
  ],
  "groups": [{"id": 1, "name": "general", "createdBy": 1, "members": [1, 2], "admins": [1], "channels": [5]}],
  "channels": [{"id": 5, "name": "lobby", "groupId": 1, "members": [1, 2]}],
  "messages": [
    {"id": 1000, "channelId": 5, "userId": null, "username": "alice", "content": "hi", "timestamp": "2023-01-01T00:00:01.000Z"},
    {"id": 1001, "channelId": 5, "userId": 2, "username": "alice", "timestamp": "2023-01-01T00:00:02.000Z"}
  ]
}"#,
        )
        .unwrap();

        // when (操作):
        let repo = JsonFileChatRepository::load(&path).await.unwrap();
        repo.append_message(new_message(5, "after restart", 1002))
            .await
            .unwrap();

        // then (期待する結果):
        let alice = repo.find_user(UserId::new(2)).await.unwrap();
        assert_eq!(alice.username.as_str(), "alice");
        assert!(backup_files(dir.path()).is_empty());
        assert!(std::fs::read_to_string(&path).unwrap().contains("alice@example.com"));

        let history = repo.get_channel_messages(ChannelId::new(5)).await;
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].user_id, None);
        assert_eq!(history[0].content.as_str(), "hi");
        assert_eq!(history[1].content.as_str(), "");
        assert_eq!(history[2].content.as_str(), "after restart");
    }

    #[tokio::test]
    async fn test_history_returns_stored_content_unchanged() {
        // テスト項目: 送信時の検証を通らない本文 (空・空白付き・長すぎる) も履歴にそのまま出る
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat_data.json");
        let long = "x".repeat(2500);
        let document = serde_json::json!({
            "users": [{"id": 1, "username": "super"}],
            "messages": [
                {"id": 1, "channelId": 3, "userId": 1, "username": "super", "content": "", "timestamp": "2023-01-01T00:00:00.000Z"},
                {"id": 2, "channelId": 3, "userId": 1, "username": "super", "content": "  padded  ", "timestamp": "2023-01-01T00:00:00.001Z"},
                {"id": 3, "channelId": 3, "userId": 1, "username": "", "content": long, "timestamp": "2023-01-01T00:00:00.002Z"}
            ]
        });
        std::fs::write(&path, document.to_string()).unwrap();
        let repo = JsonFileChatRepository::load(&path).await.unwrap();

        // when (操作):
        let history = repo.get_channel_messages(ChannelId::new(3)).await;

        // then (期待する結果):
        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["", "  padded  ", long.as_str()]);
        assert_eq!(history[2].username.as_str(), "");
    }

    #[tokio::test]
    async fn test_load_fails_when_initial_write_fails() {
        // テスト項目: 初期ドキュメントの書き込みに失敗した場合のみエラーになる
        // given (前提条件): 親ディレクトリの位置に通常ファイルがある
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        // when (操作):
        let result = JsonFileChatRepository::load(blocker.join("chat_data.json")).await;

        // then (期待する結果):
        assert!(matches!(result, Err(RepositoryError::Io(_))));
    }

    #[tokio::test]
    async fn test_appended_messages_survive_reload_in_order() {
        // テスト項目: 追記したメッセージが再読み込み後も送信順で取得できる
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat_data.json");
        let repo = JsonFileChatRepository::load(&path).await.unwrap();

        // when (操作):
        repo.append_message(new_message(5, "one", 1000)).await.unwrap();
        repo.append_message(new_message(6, "elsewhere", 1001))
            .await
            .unwrap();
        repo.append_message(new_message(5, "two", 1002)).await.unwrap();
        drop(repo);
        let reloaded = JsonFileChatRepository::load(&path).await.unwrap();

        // then (期待する結果):
        let contents: Vec<String> = reloaded
            .get_channel_messages(ChannelId::new(5))
            .await
            .into_iter()
            .map(|m| m.content.into_string())
            .collect();
        assert_eq!(contents, vec!["one".to_string(), "two".to_string()]);
    }

    #[tokio::test]
    async fn test_same_millisecond_messages_get_distinct_ids() {
        // テスト項目: 同一ミリ秒のメッセージにも異なる ID が振られる
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileChatRepository::load(dir.path().join("chat_data.json"))
            .await
            .unwrap();

        // when (操作):
        let first = repo.append_message(new_message(1, "a", 5000)).await.unwrap();
        let second = repo.append_message(new_message(1, "b", 5000)).await.unwrap();

        // then (期待する結果):
        assert_eq!(first.id, 5000);
        assert_eq!(second.id, 5001);
        assert_eq!(second.timestamp, Timestamp::new(5000));
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back_append() {
        // テスト項目: 書き込みに失敗した追記はメモリ上にも残らない
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat_data.json");
        let repo = JsonFileChatRepository::load(&path).await.unwrap();
        repo.append_message(new_message(5, "kept", 1000)).await.unwrap();

        // ファイルの位置をディレクトリに置き換えて rename を失敗させる
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        // when (操作):
        let result = repo.append_message(new_message(5, "lost", 2000)).await;

        // then (期待する結果):
        assert!(matches!(result, Err(RepositoryError::Io(_))));
        let history = repo.get_channel_messages(ChannelId::new(5)).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content.as_str(), "kept");
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_serialized() {
        // テスト項目: 並行して追記しても欠落・ID 重複が起きない
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat_data.json");
        let repo = std::sync::Arc::new(JsonFileChatRepository::load(&path).await.unwrap());

        // when (操作):
        let mut handles = Vec::new();
        for i in 0..20 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.append_message(new_message(1, &format!("m{}", i), 7000))
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果):
        let history = repo.get_channel_messages(ChannelId::new(1)).await;
        assert_eq!(history.len(), 20);
        let ids: Vec<i64> = history.iter().map(|m| m.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(ids, sorted);

        let on_disk: ChatDocument =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk.messages.len(), 20);
    }

    #[tokio::test]
    async fn test_create_user_assigns_next_id_and_rejects_duplicates() {
        // テスト項目: ユーザー作成で次の ID が振られ、重複名は拒否される
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileChatRepository::load(dir.path().join("chat_data.json"))
            .await
            .unwrap();

        // when (操作):
        let alice = repo
            .create_user("alice", "alice@example.com", "pw", Vec::new())
            .await
            .unwrap();
        let duplicate = repo
            .create_user("alice", "other@example.com", "pw", Vec::new())
            .await;

        // then (期待する結果):
        assert_eq!(alice.id, UserId::new(2));
        assert_eq!(alice.roles, vec!["User".to_string()]);
        assert!(matches!(
            duplicate,
            Err(RepositoryError::DuplicateUsername(name)) if name == "alice"
        ));
        assert_eq!(
            repo.find_user(UserId::new(2)).await.map(|u| u.username.into_string()),
            Some("alice".to_string())
        );
    }
}
