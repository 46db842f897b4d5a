use ld2_reader::ld2::format::markup::strip;

#[test]
fn cdata_content_is_returned_with_whitespace_normalized() {
    assert_eq!(strip("<![CDATA[a\tb]]>"), "a b");
    assert_eq!(strip("<x><![CDATA[one\ntwo]]></x>"), "one two");
}

#[test]
fn unterminated_cdata_yields_nothing() {
    assert_eq!(strip("<![CDATA[never closed"), "");
}

#[test]
fn processing_instruction_wrapper_keeps_inner_text() {
    assert_eq!(strip("<?xml version>hello</?>"), "hello");
    assert_eq!(strip("<?x>a\u{1e}b</?>"), "a b");
}

#[test]
fn unterminated_processing_instruction_yields_nothing() {
    assert_eq!(strip("<?xml>text without end"), "");
}

#[test]
fn text_between_tags_is_concatenated() {
    assert_eq!(strip("<b>x</b>y<i>z</i>"), "xyz");
    assert_eq!(strip("<p>a</p><p>b</p>"), "ab");
}

#[test]
fn input_without_tags_yields_nothing() {
    assert_eq!(strip("plain text"), "");
    assert_eq!(strip(""), "");
}

#[test]
fn first_character_is_never_emitted() {
    assert_eq!(strip("ab<i>c</i>"), "bc");
    assert_eq!(strip("é<b>x</b>"), "x");
}

#[test]
fn text_after_last_tag_is_dropped() {
    assert_eq!(strip("<p>a</p>tail"), "a");
}

#[test]
fn multibyte_text_survives() {
    assert_eq!(strip("<b>日本</b>"), "日本");
    assert_eq!(strip("<![CDATA[辞書]]>"), "辞書");
}

#[test]
fn separators_become_spaces() {
    assert_eq!(strip("<i>a\u{1f}b\u{1e}c\nd\te</i>"), "a b c d e");
}
