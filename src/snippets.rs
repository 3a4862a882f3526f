// Built-in code snippet library served for code requests.

use crate::matcher::fuzzy_contains_any;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub id: &'static str,
    pub keywords: &'static [&'static str],
    pub language: &'static str,
    pub code: &'static str,
}

impl Snippet {
    /// Fenced markdown block for the reply.
    pub fn to_markdown(&self) -> String {
        format!("```{}\n{}\n```", self.language, self.code.trim())
    }
}

/// First snippet, in library order, whose keywords match the input.
pub fn find_snippet<'a>(library: &'a [Snippet], input: &str) -> Option<&'a Snippet> {
    library
        .iter()
        .find(|snippet| fuzzy_contains_any(input, snippet.keywords))
}

pub fn builtin() -> &'static [Snippet] {
    LIBRARY
}

const LIBRARY: &[Snippet] = &[
    // ---- Python ----
    Snippet {
        id: "python_hello_world",
        keywords: &["python", "hello world", "print"],
        language: "python",
        code: r#"print("Hello, World!")"#,
    },
    Snippet {
        id: "python_for_loop",
        keywords: &["for", "loop", "iterate"],
        language: "python",
        code: "for i in range(5):\n    print(i)",
    },
    Snippet {
        id: "python_functions",
        keywords: &["function", "def"],
        language: "python",
        code: "def greet(name):\n    return f\"Hello, {name}!\"\nprint(greet('Sam'))",
    },
    Snippet {
        id: "python_class",
        keywords: &["class", "oop", "object"],
        language: "python",
        code: "class Person:\n    def __init__(self, name):\n        self.name = name\n    def greet(self):\n        print(f\"Hi, I'm {self.name}\")\n\np = Person('Ana')\np.greet()",
    },
    Snippet {
        id: "python_file_read",
        keywords: &["file", "read", "open"],
        language: "python",
        code: "with open('input.txt','r') as f:\n    text = f.read()\nprint(text)",
    },
    Snippet {
        id: "python_exception",
        keywords: &["try", "except", "error"],
        language: "python",
        code: "try:\n    x = 1/0\nexcept ZeroDivisionError:\n    print('div by zero')",
    },
    Snippet {
        id: "python_json",
        keywords: &["json", "serialize"],
        language: "python",
        code: "import json\ndata = {'a':1}\nprint(json.dumps(data))",
    },
    // ---- JavaScript ----
    Snippet {
        id: "javascript_fetch",
        keywords: &["fetch", "fetch api"],
        language: "javascript",
        code: "fetch('https://api.github.com')\n  .then(res => res.json())\n  .then(data => console.log(data))\n  .catch(err => console.error(err));",
    },
    Snippet {
        id: "javascript_async_await",
        keywords: &["async", "await", "promise"],
        language: "javascript",
        code: "async function fetchJson(url) {\n  const res = await fetch(url);\n  return res.json();\n}\nfetchJson('https://api.github.com').then(console.log);",
    },
    Snippet {
        id: "javascript_event_listener",
        keywords: &["event", "click", "listener"],
        language: "javascript",
        code: "document.getElementById('btn').addEventListener('click', () => {\n  alert('Clicked!');\n});",
    },
    Snippet {
        id: "javascript_debounce",
        keywords: &["debounce", "throttle"],
        language: "javascript",
        code: "function debounce(fn, delay){\n  let t;\n  return (...args) => {\n    clearTimeout(t);\n    t = setTimeout(() => fn(...args), delay);\n  };\n}",
    },
    Snippet {
        id: "javascript_hello_world",
        keywords: &["javascript", "console"],
        language: "javascript",
        code: "console.log('Hello, World!');",
    },
    // ---- Web ----
    Snippet {
        id: "html_boilerplate",
        keywords: &["html", "boilerplate", "template"],
        language: "html",
        code: "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"UTF-8\">\n  <title>Document</title>\n</head>\n<body>\n  <h1>Hello</h1>\n</body>\n</html>",
    },
    Snippet {
        id: "css_flexbox_center",
        keywords: &["css", "flexbox", "center"],
        language: "css",
        code: ".container {\n  display: flex;\n  justify-content: center;\n  align-items: center;\n  height: 100vh;\n}",
    },
    // ---- Data and tooling ----
    Snippet {
        id: "sql_select",
        keywords: &["sql", "select", "query"],
        language: "sql",
        code: "SELECT id, name FROM users WHERE active = 1 ORDER BY name;",
    },
    Snippet {
        id: "sql_join",
        keywords: &["join", "inner join"],
        language: "sql",
        code: "SELECT o.id, c.name\nFROM orders o\nJOIN customers c ON c.id = o.customer_id;",
    },
    Snippet {
        id: "bash_loop",
        keywords: &["bash", "shell", "script"],
        language: "bash",
        code: "#!/bin/bash\nfor f in *.txt; do\n  echo \"Processing $f\"\ndone",
    },
    Snippet {
        id: "git_basics",
        keywords: &["git", "commit", "push"],
        language: "bash",
        code: "git add .\ngit commit -m \"message\"\ngit push origin main",
    },
    Snippet {
        id: "regex_email",
        keywords: &["regex", "email validation"],
        language: "javascript",
        code: "const re = /^[^\\s@]+@[^\\s@]+\\.[^\\s@]+$/;\nconsole.log(re.test('a@b.com'));",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_wins() {
        let found = find_snippet(builtin(), "give me a python hello world");
        assert_eq!(found.map(|s| s.id), Some("python_hello_world"));
    }

    #[test]
    fn test_fuzzy_keyword_match() {
        let found = find_snippet(builtin(), "show me a flexbx snippet");
        assert_eq!(found.map(|s| s.id), Some("css_flexbox_center"));
    }

    #[test]
    fn test_markdown_fence() {
        let snippet = &builtin()[0];
        assert_eq!(snippet.to_markdown(), "```python\nprint(\"Hello, World!\")\n```");
    }

    #[test]
    fn test_keywords_are_lowercase() {
        for snippet in builtin() {
            for keyword in snippet.keywords {
                assert_eq!(*keyword, keyword.to_lowercase(), "{}", snippet.id);
            }
        }
    }

    #[test]
    fn test_no_match() {
        assert!(find_snippet(builtin(), "zzz qqq").is_none());
    }
}
