use texpad_parser::{parse, plain, serialize, TaggedChar};

fn assert_round_trip(source: &str) {
    let first = parse(source);
    let markup = serialize(&first);
    let second = parse(&markup);
    assert_eq!(
        first, second,
        "round trip drifted\nsource: {:?}\nserialized: {:?}",
        source, markup
    );
}

#[test]
fn test_inline_formats() {
    assert_round_trip("plain \\textbf{bold \\emph{both}} \\underline{u} \\sout{gone}\n");
}

#[test]
fn test_headings_and_paragraphs() {
    assert_round_trip(
        "\\section*{Overview}\nSome text.\n\n\\subsection*{Detail}\nMore.\n\\paragraph{Note} tail\n",
    );
}

#[test]
fn test_lists() {
    assert_round_trip(
        "\\begin{itemz}\n\\item one\n\\item two\n  continued\n\\begin{enum}\n\\item nested\n\\end{enum}\n\\end{itemz}\nafter\n",
    );
}

#[test]
fn test_list_with_caption() {
    assert_round_trip("\\begin{enum}[Steps]\n\\item first\n\\item second\n\\end{enum}\n");
}

#[test]
fn test_quotation() {
    assert_round_trip("intro\n\\begin{quotation}\nquoted line\nsecond line\n\\end{quotation}\nout\n");
}

#[test]
fn test_symbols_accents_and_ligatures() {
    assert_round_trip("caf\\'{e} na\\\"{i}ve \\ae{} \\_{} \\_ ``q'' -- --- it's \\ldots{}\n");
}

#[test]
fn test_literal_markup_survives() {
    assert_round_trip("\\foo{bar} {braces} a]b \\{x\\}\n\\begin{document}\nbody\n\\end{document}\n");
}

#[test]
fn test_soft_break_between_formatted_runs() {
    assert_round_trip("\\begin{itemz}\n\\item \\textbf{a}\n  \\textbf{b}\n\\end{itemz}\n");
}

#[test]
fn test_heading_inside_list_item() {
    assert_round_trip("\\begin{itemz}\n\\item \\section*{T}\n\\end{itemz}\n");
}

#[test]
fn test_serialized_markup_is_stable() {
    let source = "\\begin{itemz}\n\\item \\textbf{a}\n\\end{itemz}\n";
    assert_eq!(serialize(&parse(source)), source);
}

#[test]
fn test_bold_hi() {
    assert_eq!(
        parse("\\textbf{Hi}"),
        vec![TaggedChar::new('H', "b"), TaggedChar::new('i', "b")]
    );
}

#[test]
fn test_plain_round_trip() {
    let text = "title\n\tindented\n\t\tdeeper\tinner tab\n\nend";
    assert_eq!(plain::to_text(&plain::to_tagged(text)), text);
}

#[test]
fn test_tagged_chars_serialize_as_json() {
    let chars = parse("\\emph{x}");
    let json = serde_json::to_string(&chars).unwrap();
    assert_eq!(json, r#"[{"glyph":"x","tags":"i"}]"#);
}
