use cipherbreak::{vigenere, AffineCipher, AffineKey, AffineSolver, Language, Transform, VigenereCipher};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const ENGLISH: &str = include_str!("../tests/data/english.txt");

fn bench_affine(c: &mut Criterion) {
    let language = Language::english();
    let key = AffineKey::new(7, 11, 26).expect("valid key");
    let ciphertext = AffineCipher::new(key, language.alphabet())
        .expect("valid cipher")
        .encrypt(ENGLISH);
    let (line, rest) = ciphertext.split_once('\n').expect("sample has several lines");
    let solver = AffineSolver::new(&language);

    c.bench_function("affine_crack_all", |b| {
        b.iter(|| solver.crack_all(black_box(line), &[]))
    });
    c.bench_function("affine_crack_linear", |b| {
        b.iter(|| solver.crack_linear(black_box(line), black_box(rest), &[]))
    });
}

fn bench_vigenere(c: &mut Criterion) {
    let language = Language::english();
    let ciphertext = VigenereCipher::new("crypt", language.alphabet())
        .expect("valid key")
        .encrypt(ENGLISH);

    c.bench_function("vigenere_crack", |b| {
        b.iter(|| vigenere::crack(black_box(&ciphertext), 20, &language))
    });
}

criterion_group!(benches, bench_affine, bench_vigenere);
criterion_main!(benches);
