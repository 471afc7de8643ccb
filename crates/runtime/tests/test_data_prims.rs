//! End-to-end tests for the "data" primitives
//!
//! Everything goes through `invoke`/`call` with positional arguments, the
//! way the interpreter drives them.

use mbvm_runtime::{
    Arena, ExhaustionAction, ObjClass, PrimContext, PrimError, Ref, call, invoke,
    take_last_failure,
};

fn ctx_with(words: usize) -> PrimContext {
    let mut arena = Arena::new(words);
    arena.set_exhaustion_action(ExhaustionAction::Panic);
    PrimContext::with_seed(arena, 2024)
}

fn ctx() -> PrimContext {
    ctx_with(100_000)
}

fn string(ctx: &mut PrimContext, text: &str) -> Ref {
    Ref::Obj(ctx.arena.new_string(text))
}

fn text_of(ctx: &PrimContext, r: Ref) -> String {
    ctx.arena.string_lossy(r.as_obj().expect("expected a string"))
}

fn int(r: Ref) -> i32 {
    r.small_int_value().expect("expected an integer")
}

#[test]
fn test_thousand_appends_stay_linear() {
    let mut ctx = ctx();
    let mut list = invoke(&mut ctx, "newList", &[]).unwrap();
    for i in 0..1000 {
        list = invoke(&mut ctx, "addLast", &[Ref::Int(i), list]).unwrap();
    }
    assert_eq!(int(invoke(&mut ctx, "length", &[list]).unwrap()), 1000);
    for i in [1, 500, 1000] {
        assert_eq!(invoke(&mut ctx, "at", &[Ref::Int(i), list]), Ok(Ref::Int(i - 1)));
    }

    let stats = ctx.arena.stats();
    assert!(stats.relocations > 5 && stats.relocations < 30);
    assert!(stats.relocated_words < 10_000);
    assert!(stats.used_words < 15_000);
}

#[test]
fn test_join_two_empty_lists() {
    let mut ctx = ctx();
    let a = invoke(&mut ctx, "newList", &[]).unwrap();
    let b = invoke(&mut ctx, "newList", &[Ref::Int(10)]).unwrap();
    let joined = invoke(&mut ctx, "join", &[a, b]).unwrap();
    assert_eq!(invoke(&mut ctx, "length", &[joined]), Ok(Ref::Int(0)));
    // capacity equals count: the payload is the count word alone
    assert_eq!(ctx.arena.payload_words(joined.as_obj().unwrap()), 1);
}

#[test]
fn test_join_strings_cases() {
    let mut ctx = ctx();
    let a = string(&mut ctx, "a");
    let b = string(&mut ctx, "b");
    let c = string(&mut ctx, "c");
    let dash = string(&mut ctx, "-");

    let abc = invoke(&mut ctx, "makeList", &[a, b, c]).unwrap();
    let r = invoke(&mut ctx, "joinStrings", &[abc, dash]).unwrap();
    assert_eq!(text_of(&ctx, r), "a-b-c");

    let empty = invoke(&mut ctx, "makeList", &[]).unwrap();
    let r = invoke(&mut ctx, "joinStrings", &[empty, dash]).unwrap();
    assert_eq!(text_of(&ctx, r), "");

    let x = string(&mut ctx, "x");
    let single = invoke(&mut ctx, "makeList", &[x]).unwrap();
    let r = invoke(&mut ctx, "joinStrings", &[single, dash]).unwrap();
    assert_eq!(text_of(&ctx, r), "x");
}

#[test]
fn test_delete_all_then_empty() {
    let mut ctx = ctx();
    let list = invoke(&mut ctx, "makeList", &[Ref::Int(1), Ref::True, Ref::Nil]).unwrap();
    let all = string(&mut ctx, "all");
    assert_eq!(invoke(&mut ctx, "delete", &[all, list]), Ok(Ref::False));
    assert_eq!(invoke(&mut ctx, "length", &[list]), Ok(Ref::Int(0)));

    let obj = list.as_obj().unwrap();
    for i in 0..ctx.arena.payload_words(obj) {
        assert_eq!(ctx.arena.field_at(obj, i), Ref::Int(0));
    }
}

#[test]
fn test_at_last_and_out_of_range() {
    let mut ctx = ctx();
    let list = invoke(&mut ctx, "makeList", &[Ref::Int(5), Ref::Int(6), Ref::Int(7)]).unwrap();
    let last = string(&mut ctx, "last");
    let n = invoke(&mut ctx, "length", &[list]).unwrap();
    assert_eq!(
        invoke(&mut ctx, "at", &[last, list]),
        invoke(&mut ctx, "at", &[n, list])
    );
    assert_eq!(
        invoke(&mut ctx, "at", &[Ref::Int(4), list]),
        Err(PrimError::IndexOutOfRange)
    );

    assert_eq!(call(&mut ctx, "at", &[Ref::Int(0), list]), Ref::False);
    assert_eq!(take_last_failure(), Some(PrimError::IndexOutOfRange));
}

#[test]
fn test_find_in_string_cases() {
    let mut ctx = ctx();
    let hello = string(&mut ctx, "hello");
    let lo = string(&mut ctx, "lo");
    let z = string(&mut ctx, "z");
    let one = Ref::Int(1);

    assert_eq!(invoke(&mut ctx, "findInString", &[lo, hello, one]), Ok(Ref::Int(4)));
    assert_eq!(invoke(&mut ctx, "findInString", &[z, hello, one]), Ok(Ref::Int(-1)));
    assert_eq!(
        invoke(&mut ctx, "findInString", &[hello, hello, Ref::Int(6)]),
        Ok(Ref::Int(-1))
    );
}

#[test]
fn test_multibyte_string_length_and_copy() {
    let mut ctx = ctx();
    // one 3-byte code point between two ASCII ones
    let s = string(&mut ctx, "a€b");
    assert_eq!(invoke(&mut ctx, "length", &[s]), Ok(Ref::Int(3)));

    let mid = invoke(&mut ctx, "copyFromTo", &[s, Ref::Int(2), Ref::Int(2)]).unwrap();
    assert_eq!(ctx.arena.string_bytes(mid.as_obj().unwrap()), vec![0xE2, 0x82, 0xAC]);

    let at = invoke(&mut ctx, "at", &[Ref::Int(2), s]).unwrap();
    assert_eq!(text_of(&ctx, at), "€");
}

#[test]
fn test_fill_byte_array_range() {
    let mut ctx = ctx();
    let bytes = Ref::Obj(ctx.arena.new_byte_array(16));
    assert_eq!(
        invoke(&mut ctx, "fill", &[bytes, Ref::Int(256)]),
        Err(PrimError::ByteArrayStore)
    );
    assert_eq!(invoke(&mut ctx, "fill", &[bytes, Ref::Int(255)]), Ok(Ref::False));
    let obj = bytes.as_obj().unwrap();
    assert!(ctx.arena.read_bytes(obj, 0, 16).iter().all(|&b| b == 255));
    assert_eq!(invoke(&mut ctx, "length", &[bytes]), Ok(Ref::Int(16)));
}

#[test]
fn test_copy_from_to_reversed_range_is_empty() {
    let mut ctx = ctx();
    let list = invoke(&mut ctx, "makeList", &[Ref::Int(1), Ref::Int(2), Ref::Int(3)]).unwrap();
    let s = string(&mut ctx, "abc");
    for source in [list, s] {
        let r = invoke(&mut ctx, "copyFromTo", &[source, Ref::Int(3), Ref::Int(2)]).unwrap();
        assert_eq!(invoke(&mut ctx, "length", &[r]), Ok(Ref::Int(0)));
    }
}

#[test]
fn test_join_mixed_strings() {
    let mut ctx = ctx();
    let n = string(&mut ctx, "n=");
    let r = invoke(&mut ctx, "join", &[n, Ref::Int(42), Ref::False]).unwrap();
    assert_eq!(text_of(&ctx, r), "n=42false");
}

#[test]
fn test_random_selector_is_seeded() {
    let picks = |seed| {
        let mut arena = Arena::new(1024);
        arena.set_exhaustion_action(ExhaustionAction::Panic);
        let mut ctx = PrimContext::with_seed(arena, seed);
        let items: Vec<Ref> = (1..=10).map(Ref::Int).collect();
        let list = invoke(&mut ctx, "makeList", &items).unwrap();
        let random = string(&mut ctx, "random");
        (0..16)
            .map(|_| invoke(&mut ctx, "at", &[random, list]).unwrap())
            .collect::<Vec<_>>()
    };
    assert_eq!(picks(7), picks(7));
}

#[test]
fn test_reset_reclaims_everything() {
    let mut ctx = ctx_with(512);
    let free = invoke(&mut ctx, "freeMemory", &[]).unwrap();
    let mut list = invoke(&mut ctx, "newList", &[]).unwrap();
    for i in 0..50 {
        list = invoke(&mut ctx, "addLast", &[Ref::Int(i), list]).unwrap();
    }
    assert!(int(invoke(&mut ctx, "freeMemory", &[]).unwrap()) < int(free));

    ctx.arena.reset();
    assert_eq!(invoke(&mut ctx, "freeMemory", &[]), Ok(free));
}

#[test]
#[should_panic(expected = "Out of memory!")]
fn test_exhaustion_is_fatal() {
    let mut ctx = ctx_with(64);
    let mut list = invoke(&mut ctx, "newList", &[]).unwrap();
    for i in 0..1000 {
        list = invoke(&mut ctx, "addLast", &[Ref::Int(i), list]).unwrap();
    }
}

#[test]
fn test_list_without_payload_never_panics() {
    let mut ctx = ctx();
    let bare = Ref::Obj(ctx.arena.allocate(ObjClass::List, 0, Ref::Nil));
    let all = string(&mut ctx, "all");
    let last = string(&mut ctx, "last");
    let one = invoke(&mut ctx, "makeList", &[Ref::Int(1)]).unwrap();

    assert_eq!(invoke(&mut ctx, "length", &[bare]), Ok(Ref::Int(0)));
    assert_eq!(invoke(&mut ctx, "atPut", &[all, bare, Ref::Int(1)]), Ok(Ref::False));
    assert_eq!(
        invoke(&mut ctx, "atPut", &[last, bare, Ref::Int(1)]),
        Err(PrimError::IndexOutOfRange)
    );
    assert_eq!(invoke(&mut ctx, "fill", &[bare, Ref::Int(1)]), Ok(Ref::False));
    assert_eq!(invoke(&mut ctx, "delete", &[all, bare]), Ok(Ref::False));
    assert_eq!(invoke(&mut ctx, "delete", &[last, bare]), Ok(Ref::False));

    let joined = invoke(&mut ctx, "join", &[bare, one]).unwrap();
    assert_eq!(invoke(&mut ctx, "length", &[joined]), Ok(Ref::Int(1)));
    assert_eq!(invoke(&mut ctx, "at", &[Ref::Int(1), joined]), Ok(Ref::Int(1)));
    let joined = invoke(&mut ctx, "join", &[one, bare]).unwrap();
    assert_eq!(invoke(&mut ctx, "length", &[joined]), Ok(Ref::Int(1)));

    let copy = invoke(&mut ctx, "copyFromTo", &[bare, Ref::Int(1)]).unwrap();
    assert_eq!(invoke(&mut ctx, "length", &[copy]), Ok(Ref::Int(0)));
    let text = invoke(&mut ctx, "joinStrings", &[bare]).unwrap();
    assert_eq!(text_of(&ctx, text), "");
}

#[test]
fn test_overstated_count_is_clamped_everywhere() {
    let mut ctx = ctx();
    let list = invoke(&mut ctx, "makeList", &[Ref::Int(1), Ref::Int(2), Ref::Int(3)]).unwrap();
    ctx.arena.field_set(list.as_obj().unwrap(), 0, Ref::Int(99));
    let last = string(&mut ctx, "last");
    let comma = string(&mut ctx, ",");

    assert_eq!(invoke(&mut ctx, "length", &[list]), Ok(Ref::Int(3)));
    assert_eq!(invoke(&mut ctx, "at", &[last, list]), Ok(Ref::Int(3)));
    assert_eq!(
        invoke(&mut ctx, "at", &[Ref::Int(4), list]),
        Err(PrimError::IndexOutOfRange)
    );

    let copy = invoke(&mut ctx, "copyFromTo", &[list, Ref::Int(2)]).unwrap();
    assert_eq!(invoke(&mut ctx, "length", &[copy]), Ok(Ref::Int(2)));
    assert_eq!(invoke(&mut ctx, "at", &[Ref::Int(2), copy]), Ok(Ref::Int(3)));

    let joined = invoke(&mut ctx, "join", &[list, list]).unwrap();
    assert_eq!(invoke(&mut ctx, "length", &[joined]), Ok(Ref::Int(6)));
    assert_eq!(invoke(&mut ctx, "at", &[Ref::Int(4), joined]), Ok(Ref::Int(1)));

    let text = invoke(&mut ctx, "joinStrings", &[list, comma]).unwrap();
    assert_eq!(text_of(&ctx, text), "1,2,3");
}

#[test]
fn test_at_put_refuses_random() {
    let mut ctx = ctx();
    let list = invoke(&mut ctx, "makeList", &[Ref::Int(1), Ref::Int(2)]).unwrap();
    let bytes = Ref::Obj(ctx.arena.new_byte_array(4));
    let random = string(&mut ctx, "random");
    for target in [list, bytes] {
        assert_eq!(
            invoke(&mut ctx, "atPut", &[random, target, Ref::Int(9)]),
            Err(PrimError::NeedsIntegerIndex)
        );
    }
    assert_eq!(invoke(&mut ctx, "at", &[Ref::Int(1), list]), Ok(Ref::Int(1)));
    assert_eq!(invoke(&mut ctx, "at", &[Ref::Int(2), list]), Ok(Ref::Int(2)));
}
