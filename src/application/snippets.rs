//! Educational content shown next to the news and the ticker.

use rand::seq::IndexedRandom;
use rand::Rng;

/// A short programming concept with a reference link.
#[derive(Debug, PartialEq, Eq)]
pub struct Nugget {
    pub topic: &'static str,
    pub title: &'static str,
    pub body: &'static str,
    pub code: Option<&'static str>,
    pub link: &'static str,
    pub link_label: &'static str,
}

/// A bit of computing history.
#[derive(Debug, PartialEq, Eq)]
pub struct HistoryFact {
    pub title: &'static str,
    pub body: &'static str,
    pub link: &'static str,
}

pub static NUGGETS: &[Nugget] = &[
    Nugget {
        topic: "JavaScript",
        title: "Closures give a function access to its outer scope",
        body: "Per MDN: “A closure is the combination of a function bundled together with references to its surrounding state (the lexical environment).” They’re created every time a function is created.",
        code: Some(
            "function makeCounter() {\n  let n = 0;            // outer scope captured\n  return () => ++n;     // inner function closes over n\n}\nconst next = makeCounter();\nnext(); // 1\nnext(); // 2",
        ),
        link: "https://developer.mozilla.org/en-US/docs/Web/JavaScript/Guide/Closures",
        link_label: "Read more on MDN →",
    },
    Nugget {
        topic: "Rust",
        title: "Every value has exactly one owner",
        body: "When the owner goes out of scope the value is dropped. Moving a value transfers ownership, so the compiler can free memory without a garbage collector.",
        code: Some(
            "let a = String::from(\"hi\");\nlet b = a;          // ownership moves to b\n// println!(\"{a}\"); // error: value moved\nprintln!(\"{b}\");",
        ),
        link: "https://doc.rust-lang.org/book/ch04-01-what-is-ownership.html",
        link_label: "Read the Rust Book →",
    },
    Nugget {
        topic: "HTTP",
        title: "GET requests should be safe and idempotent",
        body: "A safe method does not change server state, and repeating an idempotent request has the same effect as sending it once. Caches and retries rely on both properties.",
        code: None,
        link: "https://developer.mozilla.org/en-US/docs/Glossary/Idempotent",
        link_label: "Read more on MDN →",
    },
];

pub static FACTS: &[HistoryFact] = &[
    HistoryFact {
        title: "“Software engineering” was popularized in 1968",
        body: "The term gained wide adoption after the NATO Software Engineering Conference held in Garmisch, Germany (Oct 7–11, 1968). The meetings highlighted the “software crisis” and helped establish software engineering as a discipline.",
        link: "https://en.wikipedia.org/wiki/NATO_Software_Engineering_Conferences",
    },
    HistoryFact {
        title: "The first computer “bug” was a real moth",
        body: "In 1947 operators of the Harvard Mark II taped a moth found in a relay into the logbook with the note “First actual case of bug being found.”",
        link: "https://en.wikipedia.org/wiki/Software_bug#History",
    },
    HistoryFact {
        title: "Unix time started on January 1, 1970",
        body: "Early Unix counted seconds from this epoch, and the convention spread to most operating systems and languages still in use today.",
        link: "https://en.wikipedia.org/wiki/Unix_time",
    },
];

/// One nugget and one fact for a page render.
#[derive(Debug, Clone, Copy)]
pub struct Snippets {
    pub nugget: &'static Nugget,
    pub fact: &'static HistoryFact,
}

pub fn pick_with<R: Rng + ?Sized>(rng: &mut R) -> Snippets {
    Snippets {
        nugget: NUGGETS.choose(rng).unwrap_or(&NUGGETS[0]),
        fact: FACTS.choose(rng).unwrap_or(&FACTS[0]),
    }
}

pub fn pick_random() -> Snippets {
    pick_with(&mut rand::rng())
}
