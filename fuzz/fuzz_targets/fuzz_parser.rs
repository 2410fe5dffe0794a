#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng; // faster than StdRng
use rand::{Rng, SeedableRng};
use rtfscan::{
    Destination, DestinationCx, DestinationRegistry, ErrorKind, Instruction, Parser, ParserOptions,
    Registration,
};

const HEADER: usize = 4; // 2 flag bytes + 2-byte code page

thread_local! {
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

/// Fragments the mutator splices together. Plain byte-level mutation rarely
/// produces a well-formed keyword, let alone a binary run or a surrogate pair.
static TOKEN_TABLE: &[&[u8]] = &[
    b"{",
    b"}",
    b"{\\*\\unknown ",
    b"{\\fonttbl ",
    b"{\\pict ",
    b"{\\title ",
    b"{\\upr{",
    b"{\\*\\ud{",
    b"\\par ",
    b"\\b ",
    b"\\b0 ",
    b"\\f1 ",
    b"\\dbch ",
    b"\\ansicpg932 ",
    b"\\ansicpg1251 ",
    b"\\uc0 ",
    b"\\uc2 ",
    b"\\u9733?",
    b"\\u-10179?\\u-8704?",
    b"\\u55357 ",
    b"\\'e9",
    b"\\'82\\'a0",
    b"\\'8",
    b"\\bin3 ",
    b"\\bin ",
    b"\\tab ",
    b"\\{",
    b"\\\\",
    b"\\\n",
    b"\r\n",
    b"text ",
    b"\xe9\xff",
];

/// Helper: borrow the thread-local RNG and run a closure with it.
fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        let header: [u8; HEADER] = with_rng(|rng| rng.random());
        let mut written = HEADER.min(max_size);
        data[..written].copy_from_slice(&header[..written]);

        let tokens = with_rng(|rng| rng.random_range(1..=64));
        for _ in 0..tokens {
            written += append_token(&mut data[written..], max_size - written);
        }
        written
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Append one random fragment to `buf` unless it would exceed `limit`.
/// Returns the number of bytes written.
fn append_token(buf: &mut [u8], limit: usize) -> usize {
    let token = with_rng(|rng| TOKEN_TABLE[rng.random_range(0..TOKEN_TABLE.len())]);
    if token.len() > limit {
        return 0;
    }
    buf[..token.len()].copy_from_slice(token);
    token.len()
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug, Arbitrary)]
struct Flags {
    wrap: bool,
    shallow: bool,
    codepage: u16,
}

/// Accepts every keyword so formatting state changes are exercised.
struct Sink;

impl Destination<Vec<Instruction>> for Sink {
    fn handle_keyword(
        &mut self,
        cx: &mut DestinationCx<'_, Vec<Instruction>>,
        keyword: &str,
        param: Option<i32>,
    ) -> Result<bool, ErrorKind> {
        match keyword {
            "b" => cx.chp_mut().bold = param != Some(0),
            "f" => cx.chp_mut().font = param,
            "dbch" => cx.pap_mut().char_width = rtfscan::CharWidth::DoubleByte,
            "ansicpg" => {
                if let Some(cp) = param.and_then(|p| u16::try_from(p).ok()) {
                    cx.set_codepage(cp);
                }
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn handle_blob(&mut self, cx: &mut DestinationCx<'_, Vec<Instruction>>, data: &[u8]) -> Result<(), ErrorKind> {
        let len = data.len();
        cx.defer("blob", move || {
            std::hint::black_box(len);
            Ok(())
        })
    }
}

fn parser(data: &[u8]) {
    let mut u = arbitrary::Unstructured::new(data);
    let Ok(flags) = Flags::arbitrary(&mut u) else {
        return;
    };
    let body = u.take_rest();

    let mut registry = DestinationRegistry::<Vec<Instruction>>::new();
    for name in ["rtf", "fonttbl", "pict"] {
        registry.register(name, Registration::constructor(|_, _, _| Box::new(Sink)));
    }
    registry.register("title", Registration::Property("title"));

    let parser = Parser::new(registry).with_options(ParserOptions {
        default_codepage: flags.codepage,
        max_nesting: if flags.shallow { 8 } else { 1024 },
        panic_on_error: false,
    });

    let mut input = Vec::with_capacity(body.len() + 8);
    if flags.wrap {
        input.extend_from_slice(b"{\\rtf1 ");
    }
    input.extend_from_slice(body);
    if flags.wrap {
        input.push(b'}');
    }

    let mut doc = Vec::new();
    // Only panics are failures; parse errors are expected.
    let _ = parser.parse(&input, &mut doc);
}

fuzz_target!(|data: &[u8]| parser(data));
