use simian_eval::{
    error::Exception,
    interpret::Interpreter,
    run,
    types::{Builtin, Value},
};
use std::{cell::RefCell, env, iter};
use wasm_bindgen::prelude::*;

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

thread_local! {
    // Lines written by `puts`, since `println!` cannot be used with wasm
    static OUTPUT: RefCell<Vec<String>> = RefCell::default();
}

#[wasm_bindgen]
pub fn init() -> String {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    format!(
        "Simian v{} on {} ({}), Copyright (c) {}",
        env!("CARGO_PKG_VERSION"),
        env::consts::OS,
        env::consts::ARCH,
        env!("CARGO_PKG_AUTHORS"),
    )
}

/// One session. Bindings made by a run stay visible to later runs.
#[wasm_bindgen]
pub struct World {
    interpreter: Interpreter,
}

impl Default for World {
    fn default() -> Self {
        let interpreter = Interpreter::new();
        // Shadow the builtin `puts` for the whole session
        interpreter.env.borrow_mut().set(
            "puts",
            Value::Builtin(Builtin {
                name: "puts",
                body: puts,
            }),
        );
        Self { interpreter }
    }
}

#[wasm_bindgen]
impl World {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lines written by `puts` followed by the rendered
    /// result, or the syntax errors one per line. A runtime error is a
    /// result too and renders as `ERROR: ...`.
    pub fn run(&self, src: &str) -> Result<String, String> {
        let result = run(src, &self.interpreter);
        let output = OUTPUT.with(|out| out.take());
        result
            .map(|value| {
                output
                    .into_iter()
                    .chain(iter::once(value.to_string()))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .map_err(|errors| errors.join("\n"))
    }
}

fn puts(args: Vec<Value>) -> Result<Value, Exception> {
    OUTPUT.with(|out| out.borrow_mut().extend(args.iter().map(Value::to_string)));
    Ok(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_names_the_version() {
        assert!(init().starts_with(&format!("Simian v{}", env!("CARGO_PKG_VERSION"))));
    }

    #[test]
    fn session_keeps_bindings() {
        let world = World::new();
        assert_eq!(world.run("let a = 2;"), Ok("2".to_string()));
        assert_eq!(world.run("a * 21"), Ok("42".to_string()));
        assert_eq!(
            world.run("a + true"),
            Ok("ERROR: type mismatch: INTEGER + BOOLEAN".to_string())
        );
    }

    #[test]
    fn puts_output_is_returned() {
        let world = World::new();
        // `puts` yields null, which ends the program
        assert_eq!(world.run(r#"puts("a"); 1"#), Ok("a\nnull".to_string()));
        assert_eq!(
            world.run(r#"let f = fn(x) { puts(x, "b") }; f(1)"#),
            Ok("1\nb\nnull".to_string())
        );
        // Nothing carries over into the next run
        assert_eq!(world.run("2"), Ok("2".to_string()));
        assert_eq!(world.run("puts"), Ok("builtin function".to_string()));
    }

    #[test]
    fn puts_can_be_rebound() {
        let world = World::new();
        assert_eq!(
            world.run("let puts = fn(x) { x }; puts(3)"),
            Ok("3".to_string())
        );
    }

    #[test]
    fn syntax_errors_are_joined() {
        let world = World::new();
        assert_eq!(
            world.run("let = 1;\nlet x 2;"),
            Err([
                "Parse error at line 1: expected next token to be IDENT, found =",
                "Parse error at line 2: expected next token to be =, found 2",
            ]
            .join("\n"))
        );
        assert_eq!(world.run(r#"puts("a"); let = 1;"#).map_err(|_| ()), Err(()));
        // The broken program never ran, so there is no stray output
        assert_eq!(world.run("3"), Ok("3".to_string()));
    }
}
