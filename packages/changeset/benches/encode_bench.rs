use criterion::{black_box, criterion_group, criterion_main, Criterion};
use texpad_changeset::{encode, MemoryAttributePool};
use texpad_parser::{parse, TaggedChar};

fn document(edit: &str) -> String {
    let mut source = String::new();
    for i in 0..40 {
        source.push_str(&format!("\\subsection*{{Part {}}}\n", i));
        source.push_str("Text with \\textbf{bold} words.\n");
        if i == 20 {
            source.push_str(edit);
        }
        source.push_str("\\begin{enum}\n\\item alpha\n\\item beta\n\\end{enum}\n");
    }
    source
}

fn encode_small_edit(c: &mut Criterion) {
    let from = parse(&document(""));
    let to = parse(&document("An \\emph{inserted} line.\n"));
    c.bench_function("encode_small_edit", |b| {
        b.iter(|| {
            let mut pool = MemoryAttributePool::new();
            encode(black_box(&from), black_box(&to), &mut pool)
        })
    });
}

fn encode_full_document(c: &mut Criterion) {
    let empty: Vec<TaggedChar> = Vec::new();
    let to = parse(&document(""));
    c.bench_function("encode_full_document", |b| {
        b.iter(|| {
            let mut pool = MemoryAttributePool::new();
            encode(black_box(&empty), black_box(&to), &mut pool)
        })
    });
}

criterion_group!(benches, encode_small_edit, encode_full_document);
criterion_main!(benches);
