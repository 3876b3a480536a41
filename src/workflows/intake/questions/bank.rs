use super::codec::Difficulty;

use Difficulty::{Advanced, Intermediate, Starter};

/// Curated questions for one technology, ordered from easiest to hardest.
pub(crate) struct TechnologyEntry {
    pub key: &'static str,
    pub questions: &'static [(Difficulty, &'static str)],
}

pub(crate) const ALIASES: &[(&str, &str)] = &[
    ("py", "python"),
    ("python3", "python"),
    ("golang", "go"),
    ("js", "javascript"),
    ("ecmascript", "javascript"),
    ("ts", "typescript"),
    ("node", "nodejs"),
    ("node.js", "nodejs"),
    ("reactjs", "react"),
    ("react.js", "react"),
    ("vue.js", "vue"),
    ("vuejs", "vue"),
    ("angularjs", "angular"),
    ("postgres", "postgresql"),
    ("psql", "postgresql"),
    ("mongo", "mongodb"),
    ("k8s", "kubernetes"),
    ("cpp", "c++"),
    ("csharp", "c#"),
    ("dotnet", "c#"),
    (".net", "c#"),
    ("spring boot", "spring"),
    ("springboot", "spring"),
    ("ruby on rails", "rails"),
    ("ror", "rails"),
    ("amazon web services", "aws"),
];

pub(crate) const BANK: &[TechnologyEntry] = &[
    TechnologyEntry {
        key: "python",
        questions: &[
            (Starter, "In Python, what is the difference between a list and a tuple, and when would you choose each?"),
            (Intermediate, "How do Python generators work, and how would you use one to process a file too large to fit in memory?"),
            (Advanced, "Explain the Python GIL. How does it affect CPU-bound versus I/O-bound workloads, and how would you work around it?"),
        ],
    },
    TechnologyEntry {
        key: "go",
        questions: &[
            (Starter, "In Go, what is the difference between a slice and an array, and what happens when you append past a slice's capacity?"),
            (Intermediate, "How do goroutines and channels cooperate in Go? Describe a worker pool that fans out jobs and collects results."),
            (Advanced, "How would you track down a goroutine leak in a long-running Go service, and how does context cancellation help prevent one?"),
        ],
    },
    TechnologyEntry {
        key: "rust",
        questions: &[
            (Starter, "Explain ownership and borrowing in Rust. Why can you not hold a mutable and an immutable reference at the same time?"),
            (Intermediate, "When would you reach for Rc, Arc, RefCell, or Mutex in Rust, and what does each cost you?"),
            (Advanced, "How does async Rust turn an async fn into a state machine, and why do futures need to be pinned?"),
        ],
    },
    TechnologyEntry {
        key: "javascript",
        questions: &[
            (Starter, "What is the difference between let, const, and var in JavaScript?"),
            (Intermediate, "Walk through the JavaScript event loop: how are microtasks and macrotasks scheduled relative to each other?"),
            (Advanced, "How would you diagnose a memory leak in a long-lived JavaScript application? Which closures or listeners are common culprits?"),
        ],
    },
    TechnologyEntry {
        key: "typescript",
        questions: &[
            (Starter, "What does TypeScript's strict mode change, and why would a team enable it?"),
            (Intermediate, "How do discriminated unions and type narrowing work in TypeScript? Give an example that models API responses."),
            (Advanced, "Write a TypeScript conditional or mapped type that makes every nested property of an object readonly, and explain how it resolves."),
        ],
    },
    TechnologyEntry {
        key: "java",
        questions: &[
            (Starter, "In Java, what is the contract between equals() and hashCode(), and what breaks if you violate it?"),
            (Intermediate, "Compare Java's synchronized blocks with the java.util.concurrent locks. When would you prefer each?"),
            (Advanced, "How would you tune JVM garbage collection for a latency-sensitive service? Which metrics guide your choice of collector?"),
        ],
    },
    TechnologyEntry {
        key: "c++",
        questions: &[
            (Starter, "What is RAII in C++ and how does it relate to smart pointers?"),
            (Intermediate, "Explain move semantics in C++. When does the compiler choose a move constructor over a copy constructor?"),
            (Advanced, "What kinds of undefined behavior have you hunted down in C++, and which tools help catch them?"),
        ],
    },
    TechnologyEntry {
        key: "c#",
        questions: &[
            (Starter, "In C#, what is the difference between a class and a struct?"),
            (Intermediate, "How does async/await work in C#, and what causes deadlocks when blocking on async code?"),
            (Advanced, "How would you reduce allocations in a hot C# code path? Discuss Span<T>, pooling, and value types."),
        ],
    },
    TechnologyEntry {
        key: "ruby",
        questions: &[
            (Starter, "What is the difference between a block, a proc, and a lambda in Ruby?"),
            (Intermediate, "How does Ruby's method lookup work with modules, include, and prepend?"),
        ],
    },
    TechnologyEntry {
        key: "php",
        questions: &[
            (Starter, "How do you prevent SQL injection in PHP applications?"),
            (Intermediate, "Explain how Composer autoloading works and how PSR-4 maps namespaces to files."),
        ],
    },
    TechnologyEntry {
        key: "kotlin",
        questions: &[
            (Starter, "How does Kotlin's null safety work, and when is the !! operator justified?"),
            (Intermediate, "Compare Kotlin coroutines with threads. What does structured concurrency give you?"),
        ],
    },
    TechnologyEntry {
        key: "swift",
        questions: &[
            (Starter, "What is the difference between a struct and a class in Swift?"),
            (Intermediate, "How do you avoid retain cycles in Swift closures? Explain weak versus unowned captures."),
        ],
    },
    TechnologyEntry {
        key: "django",
        questions: &[
            (Starter, "How does a request flow through Django's middleware, URL routing, and views?"),
            (Intermediate, "How would you detect and fix an N+1 query problem in the Django ORM?"),
            (Advanced, "How would you run a zero-downtime schema migration on a large table in a Django project?"),
        ],
    },
    TechnologyEntry {
        key: "flask",
        questions: &[
            (Starter, "What are Flask's application and request contexts, and why do they exist?"),
            (Intermediate, "How would you structure a large Flask application with blueprints and an application factory?"),
        ],
    },
    TechnologyEntry {
        key: "fastapi",
        questions: &[
            (Starter, "How does FastAPI use type hints and Pydantic models to validate requests?"),
            (Intermediate, "How does FastAPI's dependency injection work, and how would you use it for database sessions?"),
        ],
    },
    TechnologyEntry {
        key: "react",
        questions: &[
            (Starter, "What is the difference between props and state in React?"),
            (Intermediate, "How does the useEffect dependency array work, and what bugs come from stale closures?"),
            (Advanced, "A React list with thousands of rows renders slowly. How would you profile it and which techniques would you apply?"),
        ],
    },
    TechnologyEntry {
        key: "vue",
        questions: &[
            (Starter, "How does Vue's reactivity system track dependencies?"),
            (Intermediate, "Compare Vue's Options API with the Composition API. When does the Composition API pay off?"),
        ],
    },
    TechnologyEntry {
        key: "angular",
        questions: &[
            (Starter, "What role do modules, components, and services play in an Angular application?"),
            (Intermediate, "How does Angular change detection work, and when would you switch a component to OnPush?"),
        ],
    },
    TechnologyEntry {
        key: "nodejs",
        questions: &[
            (Starter, "Why is Node.js well suited to I/O-heavy workloads, and where does it struggle?"),
            (Intermediate, "How do Node.js streams handle backpressure?"),
            (Advanced, "How would you find what is blocking the Node.js event loop in production?"),
        ],
    },
    TechnologyEntry {
        key: "express",
        questions: &[
            (Starter, "How does middleware ordering affect request handling in Express?"),
            (Intermediate, "How do you handle errors thrown from async route handlers in Express?"),
        ],
    },
    TechnologyEntry {
        key: "spring",
        questions: &[
            (Starter, "What does dependency injection look like in Spring, and what are bean scopes?"),
            (Intermediate, "How does Spring's @Transactional work under the hood, and why does self-invocation bypass it?"),
        ],
    },
    TechnologyEntry {
        key: "rails",
        questions: &[
            (Starter, "Explain the MVC layout of a Rails application and where business logic should live."),
            (Intermediate, "How do ActiveRecord callbacks cause surprises, and what would you use instead?"),
        ],
    },
    TechnologyEntry {
        key: "sql",
        questions: &[
            (Starter, "What is the difference between an INNER JOIN and a LEFT JOIN?"),
            (Intermediate, "How do you read a query plan to decide which index to add?"),
        ],
    },
    TechnologyEntry {
        key: "postgresql",
        questions: &[
            (Starter, "What kinds of indexes does PostgreSQL offer, and when is a B-tree the wrong choice?"),
            (Intermediate, "How does MVCC work in PostgreSQL, and why does VACUUM matter?"),
            (Advanced, "How would you troubleshoot lock contention between concurrent transactions in PostgreSQL?"),
        ],
    },
    TechnologyEntry {
        key: "mysql",
        questions: &[
            (Starter, "What are the differences between the InnoDB and MyISAM storage engines?"),
            (Intermediate, "How do MySQL transaction isolation levels affect phantom reads?"),
        ],
    },
    TechnologyEntry {
        key: "mongodb",
        questions: &[
            (Starter, "When would you embed documents versus reference them in MongoDB?"),
            (Intermediate, "How does a MongoDB aggregation pipeline work? Describe one you have built."),
        ],
    },
    TechnologyEntry {
        key: "redis",
        questions: &[
            (Starter, "Which Redis data structures have you used, and for what?"),
            (Intermediate, "How would you implement a rate limiter or a distributed lock with Redis, and what are the pitfalls?"),
        ],
    },
    TechnologyEntry {
        key: "graphql",
        questions: &[
            (Starter, "How does GraphQL differ from REST in how clients request data?"),
            (Intermediate, "How do you prevent the N+1 problem in GraphQL resolvers?"),
        ],
    },
    TechnologyEntry {
        key: "docker",
        questions: &[
            (Starter, "What is the difference between a Docker image and a container?"),
            (Intermediate, "How do multi-stage Docker builds shrink images, and how do you keep layer caching effective?"),
        ],
    },
    TechnologyEntry {
        key: "kubernetes",
        questions: &[
            (Starter, "What problem do Kubernetes Deployments, Services, and Pods each solve?"),
            (Intermediate, "How do readiness and liveness probes differ in Kubernetes, and what goes wrong when they are misconfigured?"),
            (Advanced, "How would you roll out a breaking change across Kubernetes services without downtime?"),
        ],
    },
    TechnologyEntry {
        key: "aws",
        questions: &[
            (Starter, "Which AWS services have you used, and how did you secure access with IAM?"),
            (Intermediate, "How would you design a highly available web application on AWS across availability zones?"),
        ],
    },
    TechnologyEntry {
        key: "terraform",
        questions: &[
            (Starter, "What does Terraform state contain, and why should it be stored remotely?"),
            (Intermediate, "How do you structure Terraform modules shared across environments?"),
        ],
    },
    TechnologyEntry {
        key: "git",
        questions: &[
            (Starter, "What is the difference between git merge and git rebase, and when do you use each?"),
        ],
    },
];

/// Low-difficulty templates for technologies the bank does not know. `{}` is the name.
pub(crate) const UNKNOWN_TECHNOLOGY_TEMPLATES: &[&str] = &[
    "Describe a project where you used {}. What problem did it solve for you?",
    "What are the main strengths and limitations of {} compared to alternatives you know?",
];

/// Stack-independent questions used to reach the minimum question count.
pub(crate) const GENERIC_QUESTIONS: &[(Difficulty, &str)] = &[
    (Starter, "Explain your experience with version control and collaborative development workflows."),
    (Intermediate, "How do you ensure code quality and maintainability in your projects?"),
    (Intermediate, "Describe a challenging technical problem you solved recently. What was your approach?"),
];

pub(crate) fn canonical_name(token: &str) -> &str {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == token)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(token)
}

pub(crate) fn lookup(token: &str) -> Option<&'static TechnologyEntry> {
    let canonical = canonical_name(token);
    BANK.iter().find(|entry| entry.key == canonical)
}
