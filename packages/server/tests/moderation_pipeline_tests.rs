//! Moderation pipeline behavior against in-memory fakes.
//!
//! These tests exercise the full pipeline logic (classification, status
//! transitions, auto-response scheduling and generation) without a database
//! or any external API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;

use server_core::common::{CommentId, PostId, UserId};
use server_core::domains::moderation::{
    parse_verdict, AutoResponseOutcome, AutoResponsePolicy, ContentClassifier, ModerationOutcome,
    ModerationPipeline, ModerationStore, ResponseGenerator, Verdict,
};
use server_core::domains::posts::models::{Comment, ModerationStatus, Post};
use server_core::kernel::jobs::testing::TestJobQueue;
use server_core::kernel::jobs::JobQueue;

#[derive(Default)]
struct InMemoryStore {
    posts: Mutex<HashMap<PostId, Post>>,
    comments: Mutex<HashMap<CommentId, Comment>>,
    policies: Mutex<HashMap<UserId, AutoResponsePolicy>>,
}

impl InMemoryStore {
    fn add_post(&self, author_id: UserId, content: &str, status: ModerationStatus) -> PostId {
        let now = Utc::now();
        let post = Post {
            id: PostId::new(),
            author_id,
            title: "a post".to_string(),
            content: content.to_string(),
            status,
            created_at: now,
            updated_at: now,
        };
        let id = post.id;
        self.posts.lock().unwrap().insert(id, post);
        id
    }

    fn add_comment(
        &self,
        post_id: PostId,
        author_id: UserId,
        content: &str,
        status: ModerationStatus,
    ) -> CommentId {
        let now = Utc::now();
        let comment = Comment {
            id: CommentId::new(),
            post_id,
            author_id,
            content: content.to_string(),
            status,
            created_at: now,
            updated_at: now,
        };
        let id = comment.id;
        self.comments.lock().unwrap().insert(id, comment);
        id
    }

    fn add_user(&self, policy: AutoResponsePolicy) -> UserId {
        let id = UserId::new();
        self.policies.lock().unwrap().insert(id, policy);
        id
    }

    fn post_status(&self, id: PostId) -> ModerationStatus {
        self.posts.lock().unwrap()[&id].status
    }

    fn comment_status(&self, id: CommentId) -> ModerationStatus {
        self.comments.lock().unwrap()[&id].status
    }

    fn comments_on(&self, post_id: PostId) -> Vec<Comment> {
        self.comments
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ModerationStore for InMemoryStore {
    async fn post_by_id(&self, id: PostId) -> Result<Option<Post>> {
        Ok(self.posts.lock().unwrap().get(&id).cloned())
    }

    async fn comment_by_id(&self, id: CommentId) -> Result<Option<Comment>> {
        Ok(self.comments.lock().unwrap().get(&id).cloned())
    }

    async fn set_post_status(&self, id: PostId, status: ModerationStatus) -> Result<()> {
        if let Some(post) = self.posts.lock().unwrap().get_mut(&id) {
            post.status = status;
        }
        Ok(())
    }

    async fn set_comment_status(&self, id: CommentId, status: ModerationStatus) -> Result<()> {
        if let Some(comment) = self.comments.lock().unwrap().get_mut(&id) {
            comment.status = status;
        }
        Ok(())
    }

    async fn auto_response_policy(&self, user_id: UserId) -> Result<Option<AutoResponsePolicy>> {
        Ok(self.policies.lock().unwrap().get(&user_id).copied())
    }

    async fn insert_approved_comment(
        &self,
        post_id: PostId,
        author_id: UserId,
        content: &str,
    ) -> Result<Comment> {
        let now = Utc::now();
        let comment = Comment {
            id: CommentId::new(),
            post_id,
            author_id,
            content: content.to_string(),
            status: ModerationStatus::Approved,
            created_at: now,
            updated_at: now,
        };
        self.comments
            .lock()
            .unwrap()
            .insert(comment.id, comment.clone());
        Ok(comment)
    }
}

/// Classifier that always answers with the same raw reply.
struct StaticClassifier(&'static str);

#[async_trait]
impl ContentClassifier for StaticClassifier {
    async fn classify(&self, _content: &str) -> Result<Verdict> {
        Ok(parse_verdict(self.0))
    }
}

/// Classifier that flags content containing a keyword, like the real model
/// is asked to.
struct KeywordClassifier(&'static str);

#[async_trait]
impl ContentClassifier for KeywordClassifier {
    async fn classify(&self, content: &str) -> Result<Verdict> {
        if content.contains(self.0) {
            Ok(parse_verdict("0"))
        } else {
            Ok(parse_verdict("1"))
        }
    }
}

/// Classifier that simulates an API outage.
struct FailingClassifier;

#[async_trait]
impl ContentClassifier for FailingClassifier {
    async fn classify(&self, _content: &str) -> Result<Verdict> {
        Err(anyhow!("connection refused"))
    }
}

struct StaticResponder(&'static str);

#[async_trait]
impl ResponseGenerator for StaticResponder {
    async fn generate(&self, _post: &str, _comment: &str) -> Result<String> {
        Ok(self.0.to_string())
    }
}

struct Fixture {
    store: Arc<InMemoryStore>,
    job_queue: Arc<TestJobQueue>,
    pipeline: ModerationPipeline,
}

fn fixture(classifier: impl ContentClassifier + 'static) -> Fixture {
    fixture_with_responder(classifier, StaticResponder("thanks for reading!"))
}

fn fixture_with_responder(
    classifier: impl ContentClassifier + 'static,
    responder: impl ResponseGenerator + 'static,
) -> Fixture {
    let store = Arc::new(InMemoryStore::default());
    let job_queue = Arc::new(TestJobQueue::new());
    let pipeline = ModerationPipeline::new(
        store.clone(),
        Arc::new(classifier),
        Arc::new(responder),
        job_queue.clone() as Arc<dyn JobQueue>,
    );
    Fixture {
        store,
        job_queue,
        pipeline,
    }
}

fn no_auto_response() -> AutoResponsePolicy {
    AutoResponsePolicy {
        enabled: false,
        delay_minutes: 5,
    }
}

fn auto_response(delay_minutes: i32) -> AutoResponsePolicy {
    AutoResponsePolicy {
        enabled: true,
        delay_minutes,
    }
}

#[tokio::test]
async fn clean_post_is_approved() {
    let f = fixture(StaticClassifier("1"));
    let author = f.store.add_user(no_auto_response());
    let post_id = f.store.add_post(author, "hello world", ModerationStatus::Pending);

    let outcome = f.pipeline.moderate_post(post_id).await.unwrap();

    assert_eq!(outcome, ModerationOutcome::Moderated(ModerationStatus::Approved));
    assert_eq!(f.store.post_status(post_id), ModerationStatus::Approved);
}

#[tokio::test]
async fn flagged_post_is_blocked() {
    let f = fixture(StaticClassifier("0"));
    let author = f.store.add_user(no_auto_response());
    let post_id = f.store.add_post(author, "something nasty", ModerationStatus::Pending);

    let outcome = f.pipeline.moderate_post(post_id).await.unwrap();

    assert_eq!(outcome, ModerationOutcome::Moderated(ModerationStatus::Blocked));
    assert_eq!(f.store.post_status(post_id), ModerationStatus::Blocked);
}

#[tokio::test]
async fn zero_anywhere_in_reply_blocks() {
    // "10/10" contains a zero, so the substring rule rejects
    let f = fixture(StaticClassifier("I give this a 10/10"));
    let author = f.store.add_user(no_auto_response());
    let post_id = f.store.add_post(author, "great recipe", ModerationStatus::Pending);

    let outcome = f.pipeline.moderate_post(post_id).await.unwrap();

    assert_eq!(outcome, ModerationOutcome::Moderated(ModerationStatus::Blocked));
}

#[tokio::test]
async fn digitless_reply_approves() {
    let f = fixture(StaticClassifier("this content looks fine to me"));
    let author = f.store.add_user(no_auto_response());
    let post_id = f.store.add_post(author, "hello", ModerationStatus::Pending);

    let outcome = f.pipeline.moderate_post(post_id).await.unwrap();

    assert_eq!(outcome, ModerationOutcome::Moderated(ModerationStatus::Approved));
}

#[tokio::test]
async fn moderating_a_deleted_post_is_a_noop() {
    let f = fixture(StaticClassifier("1"));
    let ghost = PostId::new();

    // Running it twice must be harmless
    assert_eq!(
        f.pipeline.moderate_post(ghost).await.unwrap(),
        ModerationOutcome::EntityMissing
    );
    assert_eq!(
        f.pipeline.moderate_post(ghost).await.unwrap(),
        ModerationOutcome::EntityMissing
    );
}

#[tokio::test]
async fn classifier_outage_leaves_post_pending() {
    let f = fixture(FailingClassifier);
    let author = f.store.add_user(no_auto_response());
    let post_id = f.store.add_post(author, "hello", ModerationStatus::Pending);

    let result = f.pipeline.moderate_post(post_id).await;

    assert!(result.is_err());
    assert_eq!(f.store.post_status(post_id), ModerationStatus::Pending);
}

#[tokio::test]
async fn approved_comment_schedules_exactly_one_auto_response() {
    let f = fixture(StaticClassifier("1"));
    let post_author = f.store.add_user(auto_response(5));
    let commenter = f.store.add_user(no_auto_response());
    let post_id = f.store.add_post(post_author, "my post", ModerationStatus::Approved);
    let comment_id = f
        .store
        .add_comment(post_id, commenter, "nice!", ModerationStatus::Pending);

    let before = Utc::now();
    f.pipeline.moderate_comment(comment_id).await.unwrap();
    let after = Utc::now();

    assert_eq!(f.store.comment_status(comment_id), ModerationStatus::Approved);

    let scheduled = f.job_queue.recorded_of_type("generate_auto_response");
    assert_eq!(scheduled.len(), 1);

    // delay_minutes = 5 becomes a 300 second countdown
    let run_at = scheduled[0].run_at.expect("auto-response must be delayed");
    assert!(run_at >= before + chrono::Duration::seconds(300));
    assert!(run_at <= after + chrono::Duration::seconds(300));
}

#[tokio::test]
async fn blocked_comment_schedules_nothing() {
    let f = fixture(StaticClassifier("0"));
    let post_author = f.store.add_user(auto_response(5));
    let commenter = f.store.add_user(no_auto_response());
    let post_id = f.store.add_post(post_author, "my post", ModerationStatus::Approved);
    let comment_id = f
        .store
        .add_comment(post_id, commenter, "awful!", ModerationStatus::Pending);

    f.pipeline.moderate_comment(comment_id).await.unwrap();

    assert_eq!(f.store.comment_status(comment_id), ModerationStatus::Blocked);
    assert!(f.job_queue.recorded().is_empty());
}

#[tokio::test]
async fn disabled_policy_schedules_nothing() {
    let f = fixture(StaticClassifier("1"));
    let post_author = f.store.add_user(no_auto_response());
    let commenter = f.store.add_user(no_auto_response());
    let post_id = f.store.add_post(post_author, "my post", ModerationStatus::Approved);
    let comment_id = f
        .store
        .add_comment(post_id, commenter, "nice!", ModerationStatus::Pending);

    f.pipeline.moderate_comment(comment_id).await.unwrap();

    assert_eq!(f.store.comment_status(comment_id), ModerationStatus::Approved);
    assert!(f.job_queue.recorded().is_empty());
}

#[tokio::test]
async fn author_commenting_on_own_post_gets_no_auto_response() {
    let f = fixture(StaticClassifier("1"));
    let post_author = f.store.add_user(auto_response(5));
    let post_id = f.store.add_post(post_author, "my post", ModerationStatus::Approved);
    let comment_id = f
        .store
        .add_comment(post_id, post_author, "bump", ModerationStatus::Pending);

    f.pipeline.moderate_comment(comment_id).await.unwrap();

    assert!(f.job_queue.recorded().is_empty());
}

#[tokio::test]
async fn zero_delay_schedules_for_now() {
    let f = fixture(StaticClassifier("1"));
    let post_author = f.store.add_user(auto_response(0));
    let commenter = f.store.add_user(no_auto_response());
    let post_id = f.store.add_post(post_author, "my post", ModerationStatus::Approved);
    let comment_id = f
        .store
        .add_comment(post_id, commenter, "nice!", ModerationStatus::Pending);

    f.pipeline.moderate_comment(comment_id).await.unwrap();

    let scheduled = f.job_queue.recorded_of_type("generate_auto_response");
    assert_eq!(scheduled.len(), 1);
    let run_at = scheduled[0].run_at.unwrap();
    assert!(run_at <= Utc::now() + chrono::Duration::seconds(1));
}

#[tokio::test]
async fn auto_response_posts_an_approved_reply_by_the_post_author() {
    let f = fixture_with_responder(StaticClassifier("1"), StaticResponder("glad you liked it"));
    let post_author = f.store.add_user(auto_response(5));
    let commenter = f.store.add_user(no_auto_response());
    let post_id = f.store.add_post(post_author, "my post", ModerationStatus::Approved);
    let comment_id = f
        .store
        .add_comment(post_id, commenter, "nice!", ModerationStatus::Approved);

    let outcome = f.pipeline.generate_auto_response(comment_id).await.unwrap();

    let reply_id = match outcome {
        AutoResponseOutcome::Created(id) => id,
        other => panic!("expected a reply, got {other:?}"),
    };

    let replies: Vec<_> = f
        .store
        .comments_on(post_id)
        .into_iter()
        .filter(|c| c.id == reply_id)
        .collect();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].author_id, post_author);
    assert_eq!(replies[0].content, "glad you liked it");
    // The reply skips moderation entirely
    assert_eq!(replies[0].status, ModerationStatus::Approved);
}

#[tokio::test]
async fn auto_response_skips_comment_no_longer_approved() {
    let f = fixture(StaticClassifier("1"));
    let post_author = f.store.add_user(auto_response(5));
    let commenter = f.store.add_user(no_auto_response());
    let post_id = f.store.add_post(post_author, "my post", ModerationStatus::Approved);
    let comment_id = f
        .store
        .add_comment(post_id, commenter, "nice!", ModerationStatus::Blocked);

    let outcome = f.pipeline.generate_auto_response(comment_id).await.unwrap();

    assert_eq!(outcome, AutoResponseOutcome::NotApproved);
    // Only the trigger comment exists, no reply was added
    assert_eq!(f.store.comments_on(post_id).len(), 1);
}

#[tokio::test]
async fn end_to_end_moderation_and_auto_reply() {
    let f = fixture_with_responder(
        KeywordClassifier("garbage"),
        StaticResponder("Thanks! More on this soon."),
    );
    let post_author = f.store.add_user(auto_response(5));
    let commenter = f.store.add_user(no_auto_response());

    // The post itself passes moderation
    let post_id = f.store.add_post(post_author, "My first post", ModerationStatus::Pending);
    f.pipeline.moderate_post(post_id).await.unwrap();
    assert_eq!(f.store.post_status(post_id), ModerationStatus::Approved);

    // A hostile comment is blocked and triggers nothing
    let bad = f
        .store
        .add_comment(post_id, commenter, "this is garbage", ModerationStatus::Pending);
    f.pipeline.moderate_comment(bad).await.unwrap();
    assert_eq!(f.store.comment_status(bad), ModerationStatus::Blocked);
    assert!(f.job_queue.recorded_of_type("generate_auto_response").is_empty());

    // A friendly comment is approved and schedules one delayed reply
    let nice = f
        .store
        .add_comment(post_id, commenter, "Nice post!", ModerationStatus::Pending);
    f.pipeline.moderate_comment(nice).await.unwrap();
    assert_eq!(f.store.comment_status(nice), ModerationStatus::Approved);

    let scheduled = f.job_queue.recorded_of_type("generate_auto_response");
    assert_eq!(scheduled.len(), 1);
    let run_at = scheduled[0].run_at.unwrap();
    assert!(run_at > Utc::now() + chrono::Duration::seconds(299));

    // When the delayed job finally runs, the post author replies
    let outcome = f.pipeline.generate_auto_response(nice).await.unwrap();
    let reply_id = match outcome {
        AutoResponseOutcome::Created(id) => id,
        other => panic!("expected a reply, got {other:?}"),
    };

    let reply = f
        .store
        .comments_on(post_id)
        .into_iter()
        .find(|c| c.id == reply_id)
        .unwrap();
    assert_eq!(reply.author_id, post_author);
    assert_eq!(reply.content, "Thanks! More on this soon.");
    assert_eq!(reply.status, ModerationStatus::Approved);
}

#[tokio::test]
async fn auto_response_for_deleted_comment_is_a_noop() {
    let f = fixture(StaticClassifier("1"));
    let outcome = f
        .pipeline
        .generate_auto_response(CommentId::new())
        .await
        .unwrap();
    assert_eq!(outcome, AutoResponseOutcome::EntityMissing);
}
