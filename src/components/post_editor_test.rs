use super::*;

#[test]
fn draft_from_form_parses_category_and_status() {
    let draft = draft_from_form(Some(3), "Title", "Short", "Body", " 2 ", "published");
    assert_eq!(draft.id, Some(3));
    assert_eq!(draft.category_id, Some(2));
    assert_eq!(draft.status, PostStatus::Published);
    assert_eq!(draft.content, "Body");
}

#[test]
fn draft_from_form_defaults_unknown_inputs() {
    let draft = draft_from_form(None, "Title", "", "", "", "archived");
    assert_eq!(draft.category_id, None);
    assert_eq!(draft.status, PostStatus::Draft);
}

#[test]
fn saved_message_depends_on_mode() {
    assert_eq!(saved_message(Some(1)), "Post updated successfully");
    assert_eq!(saved_message(None), "Post created successfully");
}
