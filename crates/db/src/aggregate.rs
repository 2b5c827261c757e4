//! SQL fragments that compute relationship fields for a listing in the same
//! statement as the listing itself.
//!
//! Every builder returns a scalar sub-select suitable for a `SELECT` list.
//! The viewer id is always bound as `$n::BIGINT`; binding `NULL` (anonymous
//! viewer) makes every "by viewer" flag evaluate to `false`, because no row
//! compares equal to `NULL`.

use vidhub_core::like_target::LikeKind;

/// `COUNT(*)` of likes pointing at `entity_ref` (e.g. `v.id`).
pub fn like_count(kind: LikeKind, entity_ref: &str) -> String {
    format!(
        "(SELECT COUNT(*) FROM likes lk WHERE lk.{col} = {entity_ref})",
        col = kind.column()
    )
}

/// Whether the viewer bound at `$viewer_param` has liked `entity_ref`.
pub fn liked_by_viewer(kind: LikeKind, entity_ref: &str, viewer_param: usize) -> String {
    format!(
        "EXISTS(SELECT 1 FROM likes lv WHERE lv.{col} = {entity_ref} \
         AND lv.liked_by = ${viewer_param}::BIGINT)",
        col = kind.column()
    )
}

/// Number of subscribers of the channel `channel_ref` (e.g. `u.id`).
pub fn subscriber_count(channel_ref: &str) -> String {
    format!("(SELECT COUNT(*) FROM subscriptions sc WHERE sc.channel_id = {channel_ref})")
}

/// Number of channels `user_ref` follows.
pub fn subscribed_to_count(user_ref: &str) -> String {
    format!("(SELECT COUNT(*) FROM subscriptions st WHERE st.subscriber_id = {user_ref})")
}

/// Whether the viewer bound at `$viewer_param` follows `channel_ref`.
pub fn subscribed_by_viewer(channel_ref: &str, viewer_param: usize) -> String {
    format!(
        "EXISTS(SELECT 1 FROM subscriptions sv WHERE sv.channel_id = {channel_ref} \
         AND sv.subscriber_id = ${viewer_param}::BIGINT)"
    )
}

/// Owner summary columns from a joined `users` alias, prefixed `owner_`.
pub fn owner_columns(user_alias: &str) -> String {
    format!(
        "{u}.id AS owner_id, {u}.username AS owner_username, \
         {u}.full_name AS owner_full_name, {u}.avatar_url AS owner_avatar",
        u = user_alias
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_count_targets_kind_column() {
        assert_eq!(
            like_count(LikeKind::Comment, "c.id"),
            "(SELECT COUNT(*) FROM likes lk WHERE lk.comment_id = c.id)"
        );
    }

    #[test]
    fn liked_by_viewer_casts_viewer_param() {
        let sql = liked_by_viewer(LikeKind::Video, "v.id", 3);
        assert!(sql.starts_with("EXISTS("));
        assert!(sql.contains("lv.video_id = v.id"));
        assert!(sql.contains("lv.liked_by = $3::BIGINT"));
    }

    #[test]
    fn subscription_fragments_reference_channel() {
        assert!(subscriber_count("u.id").contains("sc.channel_id = u.id"));
        assert!(subscribed_to_count("u.id").contains("st.subscriber_id = u.id"));
        let flag = subscribed_by_viewer("u.id", 1);
        assert!(flag.contains("sv.channel_id = u.id"));
        assert!(flag.contains("sv.subscriber_id = $1::BIGINT"));
    }

    #[test]
    fn owner_columns_alias_every_field() {
        let cols = owner_columns("u");
        for alias in ["owner_id", "owner_username", "owner_full_name", "owner_avatar"] {
            assert!(cols.contains(&format!("AS {alias}")), "missing {alias}");
        }
    }
}
