//! UseCase: チャンネル履歴取得処理

use std::sync::Arc;

use crate::domain::{ChannelId, ChatRepository, Message};

/// チャンネルのメッセージ履歴を取得するユースケース
pub struct GetChannelMessagesUseCase {
    chat_repository: Arc<dyn ChatRepository>,
}

impl GetChannelMessagesUseCase {
    pub fn new(chat_repository: Arc<dyn ChatRepository>) -> Self {
        Self { chat_repository }
    }

    /// 送信順のメッセージ一覧を返す（存在しないチャンネルは空）
    pub async fn execute(&self, channel_id: ChannelId) -> Vec<Message> {
        self.chat_repository.get_channel_messages(channel_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MessageContent, NewMessage, Timestamp, UserId, Username},
        infrastructure::repository::JsonFileChatRepository,
    };

    #[tokio::test]
    async fn test_history_is_filtered_by_channel() {
        // テスト項目: 指定したチャンネルのメッセージだけが送信順で返る
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(
            JsonFileChatRepository::load(dir.path().join("chat_data.json"))
                .await
                .unwrap(),
        );
        for (channel, text) in [(5, "first"), (6, "elsewhere"), (5, "second")] {
            store
                .append_message(NewMessage {
                    channel_id: ChannelId::new(channel),
                    user_id: UserId::new(1),
                    username: Username::new("super".to_string()).unwrap(),
                    content: MessageContent::new(text.to_string()).unwrap(),
                    timestamp: Timestamp::new(1_700_000_000_000),
                })
                .await
                .unwrap();
        }
        let usecase = GetChannelMessagesUseCase::new(store);

        // when (操作):
        let history = usecase.execute(ChannelId::new(5)).await;
        let empty = usecase.execute(ChannelId::new(99)).await;

        // then (期待する結果):
        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
        assert!(empty.is_empty());
    }
}
