use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::decode;
use crate::error::Result;

/// A Discord user object as embedded in a guild member. Unknown keys are
/// kept in `extra_fields`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub avatar: Option<String>,
    pub discriminator: String,
    #[serde(alias = "publicFlags")]
    pub public_flags: u64,
    pub flags: u64,
    pub banner: Option<String>,
    #[serde(alias = "accentColor")]
    pub accent_color: Option<u32>,
    #[serde(alias = "globalName")]
    pub global_name: Option<String>,
    #[serde(alias = "avatarDecorationData")]
    pub avatar_decoration_data: Option<Value>,
    #[serde(alias = "bannerColor")]
    pub banner_color: Option<String>,
    pub clan: Option<Value>,
    #[serde(flatten)]
    pub extra_fields: Map<String, Value>,
}

/// A user's membership in a guild.
///
/// Keys the record does not know about are kept in `extra_fields` so newer
/// API fields survive a decode and re-encode.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GuildMemberRecord {
    pub avatar: Option<String>,
    #[serde(alias = "communication_disabled_until")]
    pub communication_disabled_until: Option<String>,
    pub flags: u64,
    #[serde(alias = "joined_at")]
    pub joined_at: String,
    pub nick: Option<String>,
    pub pending: bool,
    #[serde(alias = "premium_since")]
    pub premium_since: Option<String>,
    pub roles: Vec<String>,
    pub user: UserRecord,
    pub mute: bool,
    pub deaf: bool,
    pub banner: Option<String>,
    #[serde(alias = "unusual_dm_activity_until")]
    pub unusual_dm_activity_until: Option<String>,
    #[serde(flatten)]
    pub extra_fields: Map<String, Value>,
}

impl GuildMemberRecord {
    pub fn from_api(payload: Value) -> Result<Self> {
        decode("GuildMemberRecord", payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RoverError;
    use serde_json::json;

    fn user_json() -> Value {
        json!({
            "id": "2",
            "username": "bob",
            "avatar": "a_1234",
            "discriminator": "0",
            "public_flags": 64,
            "flags": 64,
            "global_name": "Bob",
            "accent_color": 16711680,
            "clan": {"tag": "ROBLX"}
        })
    }

    fn member_json() -> Value {
        json!({
            "flags": 0,
            "joinedAt": "t",
            "nick": null,
            "pending": false,
            "premiumSince": null,
            "roles": ["a"],
            "mute": false,
            "deaf": false,
            "avatar": null,
            "communicationDisabledUntil": null,
            "user": user_json(),
            "weirdNewField": "x"
        })
    }

    #[test]
    fn test_unknown_fields_go_to_extra_fields() {
        let member = GuildMemberRecord::from_api(member_json()).unwrap();

        assert_eq!(member.extra_fields.len(), 1);
        assert_eq!(member.extra_fields.get("weirdNewField"), Some(&json!("x")));
        assert_eq!(member.joined_at, "t");
        assert_eq!(member.roles, vec!["a".to_string()]);
        assert_eq!(member.flags, 0);
        assert!(!member.pending);
        assert_eq!(member.nick, None);
        assert_eq!(member.banner, None);
        assert_eq!(member.unusual_dm_activity_until, None);
    }

    #[test]
    fn test_nested_user_is_decoded() {
        let member = GuildMemberRecord::from_api(member_json()).unwrap();
        let user = member.user;

        assert_eq!(user.id, "2");
        assert_eq!(user.username, "bob");
        assert_eq!(user.avatar.as_deref(), Some("a_1234"));
        assert_eq!(user.public_flags, 64);
        assert_eq!(user.global_name.as_deref(), Some("Bob"));
        assert_eq!(user.accent_color, Some(16711680));
        assert_eq!(user.clan, Some(json!({"tag": "ROBLX"})));
        assert_eq!(user.banner_color, None);
        assert_eq!(user.avatar_decoration_data, None);
        assert!(user.extra_fields.is_empty());
    }

    #[test]
    fn test_unknown_user_fields_survive_reencode() {
        let mut payload = member_json();
        payload["user"]["primary_guild"] = json!({"identity_enabled": true});

        let member = GuildMemberRecord::from_api(payload).unwrap();
        assert_eq!(
            member.user.extra_fields.get("primary_guild"),
            Some(&json!({"identity_enabled": true}))
        );
        assert!(!member.extra_fields.contains_key("primary_guild"));

        let encoded = serde_json::to_value(&member).unwrap();
        assert_eq!(encoded["user"]["primary_guild"]["identity_enabled"], json!(true));
        assert_eq!(GuildMemberRecord::from_api(encoded).unwrap(), member);
    }

    #[test]
    fn test_snake_case_member() {
        let payload = json!({
            "flags": 2,
            "joined_at": "2023-05-01T12:00:00.000000+00:00",
            "nick": "Bobby",
            "pending": true,
            "premium_since": "2024-01-01T00:00:00.000000+00:00",
            "roles": [],
            "mute": true,
            "deaf": false,
            "avatar": null,
            "communication_disabled_until": null,
            "unusual_dm_activity_until": null,
            "banner": null,
            "user": user_json()
        });

        let member = GuildMemberRecord::from_api(payload).unwrap();
        assert_eq!(member.joined_at, "2023-05-01T12:00:00.000000+00:00");
        assert_eq!(
            member.premium_since.as_deref(),
            Some("2024-01-01T00:00:00.000000+00:00")
        );
        assert!(member.mute);
        assert!(member.extra_fields.is_empty());
    }

    #[test]
    fn test_missing_user_is_an_error() {
        let mut payload = member_json();
        payload.as_object_mut().unwrap().remove("user");

        let err = GuildMemberRecord::from_api(payload).unwrap_err();
        assert!(matches!(err, RoverError::Decode { record: "GuildMemberRecord", .. }));
    }

    #[test]
    fn test_user_missing_required_field() {
        let mut payload = member_json();
        payload["user"].as_object_mut().unwrap().remove("discriminator");

        assert!(GuildMemberRecord::from_api(payload).is_err());
    }

    #[test]
    fn test_extra_fields_survive_reencode() {
        let member = GuildMemberRecord::from_api(member_json()).unwrap();
        let encoded = serde_json::to_value(&member).unwrap();

        assert_eq!(encoded["weirdNewField"], json!("x"));
        assert_eq!(encoded["joinedAt"], json!("t"));
        assert_eq!(GuildMemberRecord::from_api(encoded).unwrap(), member);
    }

    #[test]
    fn test_member_decode_is_repeatable() {
        let first = GuildMemberRecord::from_api(member_json()).unwrap();
        let second = GuildMemberRecord::from_api(member_json()).unwrap();
        assert_eq!(first, second);
    }
}
