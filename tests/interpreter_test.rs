// ABOUTME: Transcript-level integration tests driving the full REPL

use cellisp::config::Style;
use cellisp::interp::Interp;
use cellisp::io::MemIo;
use pretty_assertions::assert_eq;

/// Runs a whole session against the in-memory host and returns everything the
/// interpreter printed (prompts are a host concern and don't appear).
fn run(input: &str) -> String {
    let (io, output) = MemIo::new(input);
    let mut interp = Interp::new(Box::new(io), Style::plain());
    interp.repl();
    let bytes = output.borrow().clone();
    String::from_utf8(bytes).expect("REPL output is valid UTF-8")
}

// ============================================================================
// Arithmetic
// ============================================================================

#[test]
fn test_addition() {
    assert_eq!(run("(plus 2 3)\n"), "5\n");
}

#[test]
fn test_arithmetic_and_aliases() {
    assert_eq!(run("(+ 2 3)\n"), "5\n");
    assert_eq!(run("(- 7 2)\n"), "5\n");
    assert_eq!(run("(* 3 4)\n"), "12\n");
    assert_eq!(run("(/ 9 2)\n"), "4\n");
    assert_eq!(run("(diff 2 7)\n"), "-5\n");
    assert_eq!(run("(inc 41)\n"), "42\n");
    assert_eq!(run("(dec 1)\n"), "0\n");
}

#[test]
fn test_comparisons() {
    assert_eq!(run("(lessp 1 2)\n"), "t\n");
    assert_eq!(run("(< 2 1)\n"), "nil\n");
    assert_eq!(run("(greaterp 2 1)\n"), "t\n");
    assert_eq!(run("(> 1 2)\n"), "nil\n");
}

// ============================================================================
// Definition and application
// ============================================================================

#[test]
fn test_factorial() {
    let session = "(defun fact (n) (cond ((zerop n) 1) (t (times n (fact (sub1 n))))))\n\
                   (fact 5)\n";
    assert_eq!(run(session), "nil\n120\n");
}

#[test]
fn test_defn_alias_defines_functions() {
    assert_eq!(run("(defn twice (n) (plus n n))\n(twice 8)\n"), "nil\n16\n");
}

#[test]
fn test_funcall_on_quoted_builtin() {
    assert_eq!(run("(funcall 'car '(1 2 3))\n"), "1\n");
}

#[test]
fn test_funcall_on_quoted_user_function() {
    let session = "(defun double (n) (times n 2))\n(funcall 'double 21)\n";
    assert_eq!(run(session), "nil\n42\n");
}

#[test]
fn test_apply_behaves_like_funcall() {
    assert_eq!(run("(apply 'car '(9 8))\n"), "9\n");
}

#[test]
fn test_funcall_of_non_callable_degrades() {
    assert_eq!(run("(funcall 'cond t)\n"), "nil\n");
}

#[test]
fn test_eval_resolves_a_quoted_symbol() {
    assert_eq!(run("(setq x 4)\n(eval 'x)\n"), "4\n4\n");
}

#[test]
fn test_read_pulls_the_next_form_from_the_stream() {
    // (read) consumes the rest of the line, newline included, so only the
    // second line's result is printed
    assert_eq!(run("(setq x (read)) 42 7\nx\n"), "(427)\n");
}

// ============================================================================
// Lists and quoting
// ============================================================================

#[test]
fn test_setq_car_cdr_transcript() {
    assert_eq!(
        run("(setq x '(a b c))\n(car x)\n(cdr x)\n"),
        "(abc)\na\n(bc)\n"
    );
}

#[test]
fn test_cons_pairs_evaluated_arguments() {
    assert_eq!(run("(setq a 1)\n(setq b 2)\n(cons a b)\n"), "1\n2\n(12)\n");
}

#[test]
fn test_list_is_reversed_and_left_nested() {
    // the fold runs q = cons(q, element), so the result nests leftward in
    // reverse order instead of building a conventional list
    assert_eq!(run("(list 1 2 3)\n"), "(((1)2)3)\n");
}

#[test]
fn test_print_emits_flat_structure() {
    assert_eq!(run("(print '(a b))\n"), "ab\nnil\n");
    assert_eq!(run("(print 42)\n"), "42\nnil\n");
}

#[test]
fn test_quoted_symbol_round_trip() {
    assert_eq!(run("(setq x 'hello)\nx\n"), "hello\nhello\n");
}

// ============================================================================
// Predicates and logic
// ============================================================================

#[test]
fn test_eq_identity() {
    assert_eq!(run("(eq 'x 'x)\n"), "t\n");
    assert_eq!(run("(eq 'x 'y)\n"), "nil\n");
    assert_eq!(run("(eq nil nil)\n"), "t\n");
}

#[test]
fn test_null_and_atom() {
    assert_eq!(run("(null nil)\n"), "t\n");
    assert_eq!(run("(null '(a))\n"), "nil\n");
    assert_eq!(run("(atom '(a))\n"), "nil\n");
    assert_eq!(run("(atom 'a)\n"), "t\n");
    assert_eq!(run("(atom 5)\n"), "t\n");
}

#[test]
fn test_cond_first_hit_wins() {
    assert_eq!(run("(cond ((lessp 1 2) 'yes) (t 'no))\n"), "yes\n");
    assert_eq!(run("(cond (t 5))\n"), "5\n");
    assert_eq!(run("(cond (nil 5))\n"), "nil\n");
}

#[test]
fn test_not() {
    assert_eq!(run("(not nil)\n"), "t\n");
    assert_eq!(run("(not t)\n"), "nil\n");
}

#[test]
fn test_and_or_ignore_surrounding_bindings() {
    // and/or evaluate their forms in the empty environment, so even a bound
    // variable reads as empty there
    assert_eq!(run("(setq x 5)\n(and x)\n"), "5\nnil\n");
    assert_eq!(run("(and t 1)\n"), "t\n");
    assert_eq!(run("(or nil t)\n"), "t\n");
    assert_eq!(run("(or nil nil)\n"), "nil\n");
}

#[test]
fn test_number_predicates() {
    assert_eq!(run("(zerop 0)\n"), "t\n");
    assert_eq!(run("(zero? 1)\n"), "nil\n");
    assert_eq!(run("(numberp 5)\n"), "t\n");
    assert_eq!(run("(number? 'a)\n"), "nil\n");
}

// ============================================================================
// Prog, labels, go, return
// ============================================================================

#[test]
fn test_prog_countdown_sum() {
    let session = "(prog (i s) (setq i 10) (setq s 0) loop \
                   (cond ((zerop i) (return s))) \
                   (setq s (plus s i)) (setq i (sub1 i)) (go loop))\n";
    assert_eq!(run(session), "55\n");
}

#[test]
fn test_prog_without_return_yields_last_statement() {
    assert_eq!(run("(prog (i) (setq i 3) (plus i 1))\n"), "4\n");
}

#[test]
fn test_prog_locals_start_unbound() {
    assert_eq!(run("(setq i 9)\n(prog (i) (return i))\n"), "9\nnil\n");
}

#[test]
fn test_nested_prog_inner_return_only_unwinds_inner() {
    let session = "(prog (a) (prog (b) (return 5)) (setq a 9) (return a))\n";
    assert_eq!(run(session), "9\n");
}

// ============================================================================
// REPL surface and recovery
// ============================================================================

#[test]
fn test_empty_line_prints_nil() {
    assert_eq!(run("\n"), "nil\n");
    assert_eq!(run("\n\n"), "nil\nnil\n");
}

#[test]
fn test_stray_paren_survivable() {
    assert_eq!(run(")\n(plus 1 1)\n"), "oops!\n2\n");
}

#[test]
fn test_top_level_number_is_an_error() {
    assert_eq!(run("5\n(plus 2 2)\n"), "oops!\n4\n");
}

#[test]
fn test_unknown_byte_is_an_error() {
    assert_eq!(run("#\n(plus 2 2)\n"), "oops!\n4\n");
}

#[test]
fn test_bare_symbol_prints_its_value() {
    assert_eq!(run("(setq x 7)\nx\n"), "7\n7\n");
    assert_eq!(run("mystery\n"), "nil\n");
}

#[test]
fn test_brackets_and_commas() {
    assert_eq!(run("[plus 1 2]\n"), "3\n");
    assert_eq!(run("(plus 1,2)\n"), "3\n");
}

#[test]
fn test_session_state_carries_across_lines() {
    let session = "(setq total 0)\n\
                   (setq total (plus total 5))\n\
                   (setq total (plus total 7))\n\
                   total\n";
    assert_eq!(run(session), "0\n5\n12\n12\n");
}

// ============================================================================
// Host commands and heap policy
// ============================================================================

#[test]
fn test_registered_host_command_is_callable_by_name() {
    fn chirp(interp: &mut Interp) {
        interp.write_str("chirp\n");
    }

    let (io, output) = MemIo::new("(chirp)\n");
    let mut interp = Interp::new(Box::new(io), Style::plain());
    interp.register_host("chirp", chirp);
    interp.repl();
    let text = String::from_utf8(output.borrow().clone()).unwrap();
    assert_eq!(text, "chirp\nnil\n");
}

#[test]
fn test_heap_grows_monotonically() {
    let (io, _output) = MemIo::new("(defun f (n) (cons n n))\n(f 1)\n(f 2)\n");
    let mut interp = Interp::new(Box::new(io), Style::plain());
    let before = interp.heap().len();
    interp.repl();
    assert!(interp.heap().len() > before);
}
