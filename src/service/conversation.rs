use std::collections::HashMap;

use crate::{
    models::{
        messagemodel::{Conversation, DirectMessage},
        usermodel::User,
    },
    utils::avatar::initials_avatar,
};

/// Label used for counterparts missing from the user directory.
pub const UNKNOWN_CONTACT_NAME: &str = "User";

/// Groups the messages `user_id` sent or received into one conversation per counterpart,
/// most recently active first. Messages not involving `user_id` are ignored.
pub fn aggregate_conversations(
    messages: &[DirectMessage],
    directory: &[User],
    user_id: &str,
) -> Vec<Conversation> {
    let contacts: HashMap<&str, &User> = directory
        .iter()
        .map(|user| (user.id.as_str(), user))
        .collect();

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut conversations: Vec<Conversation> = Vec::new();

    for message in messages.iter().filter(|m| m.involves(user_id)) {
        let contact_id = message.counterpart_of(user_id);
        let unread = u32::from(message.is_unread_for(user_id));

        if let Some(&position) = index.get(contact_id) {
            let conversation = &mut conversations[position];
            if message.sent_at > conversation.last_timestamp {
                conversation.last_message = message.content.clone();
                conversation.last_timestamp = message.sent_at;
            }
            conversation.unread_count += unread;
            conversation.messages.push(message.clone());
            continue;
        }

        let contact = contacts.get(contact_id);
        let contact_name = contact
            .map(|user| user.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_CONTACT_NAME)
            .to_string();
        let contact_avatar = contact
            .and_then(|user| user.avatar.clone())
            .filter(|avatar| !avatar.is_empty())
            .unwrap_or_else(|| initials_avatar(contact_id));

        index.insert(contact_id, conversations.len());
        conversations.push(Conversation {
            contact_id: contact_id.to_string(),
            contact_name,
            contact_avatar,
            last_message: message.content.clone(),
            last_timestamp: message.sent_at,
            unread_count: unread,
            messages: vec![message.clone()],
        });
    }

    conversations.sort_by(|a, b| b.last_timestamp.cmp(&a.last_timestamp));
    conversations
}
