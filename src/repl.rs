// ABOUTME: Line-oriented read-eval-print loop with oops! recovery

use crate::cell::NIL;
use crate::interp::Interp;
use crate::io::Io;
use crate::reader::Token;

impl Interp {
    /// Drives the session: prompt, read one top-level form, evaluate it in
    /// the root environment, and print the result at end of line. A
    /// malformed token prints `oops!` and discards the rest of the line.
    /// Returns when the input ends.
    pub fn repl(&mut self) {
        let mut result = NIL;
        let mut pending = false;
        let mut recovering = false;

        loop {
            if !pending && !recovering {
                let prompt = self.style.prompt;
                self.io.prompt(prompt);
            }

            match self.peek_token() {
                Token::Lparen => {
                    self.io.get_byte();
                    let form = self.read();
                    let env = self.env;
                    result = self.eval(form, env);
                    pending = true;
                }

                // a bare name at top level resolves straight to its value
                Token::Alpha => {
                    let wrapper = self.read_symbol();
                    result = self.heap.tail(self.heap.head(wrapper));
                    pending = true;
                }

                Token::Quoted | Token::Rparen | Token::Digit | Token::Err => {
                    self.io.get_byte();
                    let marker = self.style.oops;
                    self.write_str(marker);
                    self.io.put_byte(b'\n');
                    result = NIL;
                    recovering = true;
                }

                Token::Eol => {
                    self.io.get_byte();
                    if !recovering {
                        if result.is_nil() {
                            self.write_str("nil");
                        } else {
                            let wrapped = self.heap.cons(result, NIL);
                            self.print(wrapped);
                        }
                        self.io.put_byte(b'\n');
                        self.io.flush();
                    }
                    result = NIL;
                    pending = false;
                    recovering = false;
                }

                Token::Eot => {
                    self.io.get_byte();
                    return;
                }
            }
        }
    }
}
