//! Integration tests for the shell
//!
//! The shell is driven with in-memory services. Responses can be held back
//! with oneshot gates so tests control the order in which they resolve.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tokio::sync::{mpsc, oneshot};

use ai_code_assistant::api::{ChatService, WorkspaceService};
use ai_code_assistant::chat::{Role, SessionId};
use ai_code_assistant::layout::{LayoutController, ResizePolicy, DEFAULT_SIDEBAR_WIDTH};
use ai_code_assistant::viewer::FileContent;
use ai_code_assistant::workspace::{DirState, TreeNode};
use ai_code_assistant::{ApiError, Completion, Services, Shell};

fn not_found(path: &str) -> ApiError {
    ApiError::Server {
        status: 404,
        detail: format!("{path} not found"),
    }
}

/// Workspace backed by maps, recording every call
#[derive(Default)]
struct FakeWorkspace {
    listings: Mutex<HashMap<String, Vec<TreeNode>>>,
    files: Mutex<HashMap<String, String>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeWorkspace {
    fn with_listing(self, path: &str, items: Vec<TreeNode>) -> Self {
        self.listings.lock().unwrap().insert(path.to_string(), items);
        self
    }

    fn with_file(self, path: &str, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), content.to_string());
        self
    }

    /// Hold back the response to `call` until the returned sender fires
    fn gate(&self, call: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(call.to_string(), rx);
        tx
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn record(&self, call: String) {
        let gate = {
            self.calls.lock().unwrap().push(call.clone());
            self.gates.lock().unwrap().remove(&call)
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }
}

#[async_trait]
impl WorkspaceService for FakeWorkspace {
    async fn list_directory(&self, path: &str) -> Result<Vec<TreeNode>, ApiError> {
        self.record(format!("list:{path}")).await;
        self.listings
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path))
    }

    async fn read_file(&self, path: &str) -> Result<String, ApiError> {
        self.record(format!("read:{path}")).await;
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path))
    }
}

/// Chat service that answers "echo: <message>"
#[derive(Default)]
struct FakeChat {
    fail_turns: bool,
    fail_deletes: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeChat {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatService for FakeChat {
    async fn send_turn(&self, session_id: &SessionId, message: &str) -> Result<String, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("turn:{}:{}", session_id.wire(), message));
        if self.fail_turns {
            return Err(ApiError::Server {
                status: 500,
                detail: "model unavailable".to_string(),
            });
        }
        Ok(format!("echo: {message}"))
    }

    async fn delete_conversation(&self, session_id: &SessionId) -> Result<(), ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("delete:{}", session_id.wire()));
        if self.fail_deletes {
            return Err(ApiError::Transport {
                url: "http://localhost:8000".to_string(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}

fn shell_with(
    workspace: Arc<FakeWorkspace>,
    chat: Arc<FakeChat>,
) -> (Shell, mpsc::Receiver<Completion>) {
    let (tx, rx) = mpsc::channel(16);
    let layout = LayoutController::new(DEFAULT_SIDEBAR_WIDTH, ResizePolicy::Clamp);
    (Shell::new(layout, Services::new(workspace, chat), tx), rx)
}

async fn next_completion(rx: &mut mpsc::Receiver<Completion>) -> Completion {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for completion")
        .expect("completion channel closed")
}

fn root_listing() -> Vec<TreeNode> {
    vec![
        TreeNode::file("main.py", "main.py"),
        TreeNode::directory("src", "src"),
    ]
}

fn transcript(shell: &Shell) -> Vec<(Role, String)> {
    shell
        .chat()
        .transcript()
        .messages()
        .iter()
        .map(|m| (m.role, m.content.clone()))
        .collect()
}

#[tokio::test]
async fn test_browse_and_open_file() {
    let workspace = Arc::new(
        FakeWorkspace::default()
            .with_listing(".", root_listing())
            .with_listing("src", vec![TreeNode::file("app.py", "src/app.py")])
            .with_file("main.py", "print('hello')\n"),
    );
    let (mut shell, mut rx) = shell_with(workspace.clone(), Arc::new(FakeChat::default()));

    shell.mount();
    let completion = next_completion(&mut rx).await;
    assert!(shell.apply(completion));
    assert_eq!(shell.tree().children("."), root_listing().as_slice());

    // Expanding a directory fires a listing for it
    shell.activate(&TreeNode::directory("src", "src"));
    let expanded: Vec<&str> = shell.tree().expansion().iter().collect();
    assert_eq!(expanded, vec![".", "src"]);
    let completion = next_completion(&mut rx).await;
    assert!(shell.apply(completion));

    // Selecting a file shows Loading, then its content
    shell.activate(&TreeNode::file("main.py", "main.py"));
    assert_eq!(shell.viewer().content(), Some(&FileContent::Loading));
    let completion = next_completion(&mut rx).await;
    assert!(shell.apply(completion));

    let selected = shell.viewer().selected().unwrap();
    assert_eq!(selected.path, "main.py");
    assert_eq!(selected.name, "main.py");
    assert_eq!(
        shell.viewer().content(),
        Some(&FileContent::Loaded("print('hello')\n".to_string()))
    );
    assert_eq!(shell.tree().highlighted(), Some("main.py"));

    assert_eq!(workspace.calls(), vec!["list:.", "list:src", "read:main.py"]);
}

#[tokio::test]
async fn test_reexpanding_uses_cached_listing() {
    let workspace = Arc::new(
        FakeWorkspace::default()
            .with_listing(".", root_listing())
            .with_listing("src", vec![]),
    );
    let (mut shell, mut rx) = shell_with(workspace.clone(), Arc::new(FakeChat::default()));
    let src = TreeNode::directory("src", "src");

    shell.mount();
    let completion = next_completion(&mut rx).await;
    shell.apply(completion);

    shell.activate(&src);
    let completion = next_completion(&mut rx).await;
    shell.apply(completion);
    assert_eq!(shell.tree().dir_state("src"), Some(&DirState::Loaded(vec![])));

    // Collapse and expand again
    shell.activate(&src);
    assert!(!shell.tree().is_expanded("src"));
    shell.activate(&src);
    assert!(shell.tree().is_expanded("src"));

    assert!(rx.try_recv().is_err());
    assert_eq!(workspace.calls(), vec!["list:.", "list:src"]);
}

#[tokio::test]
async fn test_refresh_reloads_expanded_directories() {
    let workspace = Arc::new(
        FakeWorkspace::default()
            .with_listing(".", root_listing())
            .with_listing("src", vec![TreeNode::file("app.py", "src/app.py")]),
    );
    let (mut shell, mut rx) = shell_with(workspace.clone(), Arc::new(FakeChat::default()));

    shell.mount();
    let completion = next_completion(&mut rx).await;
    shell.apply(completion);
    shell.activate(&TreeNode::directory("src", "src"));
    let completion = next_completion(&mut rx).await;
    shell.apply(completion);

    let before = shell.tree().generation();
    shell.refresh_tree();
    assert_eq!(shell.tree().generation(), before + 1);
    assert!(shell.tree().is_expanded("src"));

    for _ in 0..2 {
        let completion = next_completion(&mut rx).await;
        assert!(shell.apply(completion));
    }

    let mut calls = workspace.calls();
    calls[2..].sort();
    assert_eq!(calls, vec!["list:.", "list:src", "list:.", "list:src"]);
    assert_eq!(shell.tree().children("src").len(), 1);
}

#[tokio::test]
async fn test_listing_from_before_refresh_is_discarded() {
    let workspace = Arc::new(FakeWorkspace::default().with_listing(".", root_listing()));
    let release_first = workspace.gate("list:.");
    let (mut shell, mut rx) = shell_with(workspace.clone(), Arc::new(FakeChat::default()));

    shell.mount();
    // Give the first fetch time to reach the gate before refreshing
    tokio::task::yield_now().await;
    shell.refresh_tree();

    let fresh = next_completion(&mut rx).await;
    assert!(shell.apply(fresh));

    release_first.send(()).unwrap();
    let stale = next_completion(&mut rx).await;
    assert!(!shell.apply(stale));
    assert_eq!(shell.tree().children(".").len(), 2);
}

#[tokio::test]
async fn test_failed_listing_is_marked_failed() {
    let workspace = Arc::new(FakeWorkspace::default());
    let (mut shell, mut rx) = shell_with(workspace, Arc::new(FakeChat::default()));

    shell.mount();
    let completion = next_completion(&mut rx).await;
    assert!(shell.apply(completion));

    assert_eq!(shell.tree().dir_state("."), Some(&DirState::Failed));
    assert!(shell.tree().children(".").is_empty());
}

#[tokio::test]
async fn test_last_selected_file_wins() {
    let workspace = Arc::new(
        FakeWorkspace::default()
            .with_file("a.py", "A")
            .with_file("b.py", "B"),
    );
    let release_a = workspace.gate("read:a.py");
    let (mut shell, mut rx) = shell_with(workspace, Arc::new(FakeChat::default()));

    shell.activate(&TreeNode::file("a.py", "a.py"));
    shell.activate(&TreeNode::file("b.py", "b.py"));

    // B resolves first, then the slow read of A
    let b = next_completion(&mut rx).await;
    assert!(shell.apply(b));
    release_a.send(()).unwrap();
    let a = next_completion(&mut rx).await;
    assert!(!shell.apply(a));

    assert_eq!(shell.viewer().selected().unwrap().path, "b.py");
    assert_eq!(
        shell.viewer().content(),
        Some(&FileContent::Loaded("B".to_string()))
    );
}

#[tokio::test]
async fn test_failed_read_shows_inline_error() {
    let workspace = Arc::new(FakeWorkspace::default());
    let (mut shell, mut rx) = shell_with(workspace, Arc::new(FakeChat::default()));

    shell.activate(&TreeNode::file("gone.py", "gone.py"));
    let completion = next_completion(&mut rx).await;
    assert!(shell.apply(completion));

    match shell.viewer().content() {
        Some(FileContent::Failed(text)) => {
            assert!(text.starts_with("Error loading file:"));
            assert!(text.contains("gone.py not found"));
        }
        other => panic!("expected inline error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_chat_turn() {
    let chat = Arc::new(FakeChat::default());
    let (mut shell, mut rx) = shell_with(Arc::new(FakeWorkspace::default()), chat.clone());

    assert!(shell.send_message("hello"));
    assert_eq!(transcript(&shell), vec![(Role::User, "hello".to_string())]);
    assert!(!shell.chat().input_enabled());

    let completion = next_completion(&mut rx).await;
    assert!(shell.apply(completion));

    assert_eq!(
        transcript(&shell),
        vec![
            (Role::User, "hello".to_string()),
            (Role::Assistant, "echo: hello".to_string()),
        ]
    );
    assert!(shell.chat().input_enabled());

    let wire = shell.chat().session_id().wire();
    assert_eq!(chat.calls(), vec![format!("turn:{wire}:hello")]);
}

#[tokio::test]
async fn test_send_while_awaiting_is_ignored() {
    let chat = Arc::new(FakeChat::default());
    let (mut shell, mut rx) = shell_with(Arc::new(FakeWorkspace::default()), chat.clone());

    assert!(shell.send_message("first"));
    assert!(!shell.send_message("second"));
    assert!(!shell.send_message("   "));

    let completion = next_completion(&mut rx).await;
    shell.apply(completion);

    assert_eq!(chat.calls().len(), 1);
    assert_eq!(shell.chat().transcript().len(), 2);
}

#[tokio::test]
async fn test_failed_turn_becomes_assistant_message() {
    let chat = Arc::new(FakeChat {
        fail_turns: true,
        ..FakeChat::default()
    });
    let (mut shell, mut rx) = shell_with(Arc::new(FakeWorkspace::default()), chat);

    for c in "hi".chars() {
        shell.chat_mut().push_char(c);
    }
    assert!(shell.submit_input());
    assert_eq!(shell.chat().input(), "");

    let completion = next_completion(&mut rx).await;
    assert!(shell.apply(completion));

    let last = shell.chat().transcript().last().unwrap();
    assert_eq!(last.role, Role::Assistant);
    assert!(last.content.starts_with("Error:"));
    assert!(last.content.contains("model unavailable"));
    assert!(shell.chat().input_enabled());
}

#[tokio::test]
async fn test_clear_resets_even_when_delete_fails() {
    let chat = Arc::new(FakeChat {
        fail_deletes: true,
        ..FakeChat::default()
    });
    let (mut shell, mut rx) = shell_with(Arc::new(FakeWorkspace::default()), chat.clone());

    shell.send_message("hello");
    let completion = next_completion(&mut rx).await;
    shell.apply(completion);

    let old = shell.chat().session_id();
    shell.clear_chat();

    assert_ne!(shell.chat().session_id(), old);
    assert!(shell.chat().transcript().is_empty());
    assert!(shell.chat().input_enabled());

    let deleted = next_completion(&mut rx).await;
    assert!(!shell.apply(deleted));
    assert!(shell.chat().transcript().is_empty());
    assert_eq!(chat.calls().last().unwrap(), &format!("delete:{}", old.wire()));
}

#[tokio::test]
async fn test_reply_after_clear_is_dropped() {
    let chat = Arc::new(FakeChat::default());
    let (mut shell, mut rx) = shell_with(Arc::new(FakeWorkspace::default()), chat);

    shell.send_message("slow question");
    shell.clear_chat();

    // One turn reply and one delete confirmation, in either order
    for _ in 0..2 {
        let completion = next_completion(&mut rx).await;
        assert!(!shell.apply(completion));
    }

    assert!(shell.chat().transcript().is_empty());
    assert!(shell.chat().input_enabled());
}
