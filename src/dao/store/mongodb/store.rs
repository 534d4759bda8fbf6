use std::{future::Future, sync::Arc};

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, ClientSession, Collection, Database, IndexModel,
    bson::{Bson, DateTime, Document, doc},
    options::IndexOptions,
};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{
        CONTACTS, ContactDocument, GAMES, GameDocument, JOIN_REQUESTS, JoinRequestDocument,
        MESSAGES, MessageDocument, NOTIFICATIONS, NotificationDocument, PARTICIPANTS,
        ParticipantDocument, TEAM_MEMBERS, TEAMS, TOURNAMENT_STATUSES, TOURNAMENT_TYPES,
        TOURNAMENTS, TeamDocument, TeamMemberDocument, TournamentDocument,
        TournamentStatusDocument, TournamentTypeDocument, USERS, UserDocument, doc_id,
    },
};
use crate::dao::{
    models::{
        ContactEntity, ContactStatus, GameEntity, JoinRequestEntity, JoinRequestFilter,
        JoinRequestStatus, MessageEntity, MessageFilter, NotificationEntity, ParticipantEntity,
        StatsEntity, TeamEntity, TeamMemberEntity, TeamRole, TournamentEntity,
        TournamentStatusEntity, TournamentTypeEntity, UserEntity,
    },
    storage::StorageResult,
    store::{ArenaStore, TournamentFilter},
};

/// Unique and lookup indexes mirroring the relational constraints of the model.
const INDEXES: &[(&str, &[&str], &str, bool)] = &[
    (USERS, &["email"], "user_email_idx", true),
    (GAMES, &["name"], "game_name_idx", true),
    (TOURNAMENT_TYPES, &["name"], "tournament_type_name_idx", true),
    (TOURNAMENTS, &["game_id"], "tournament_game_idx", false),
    (
        TOURNAMENT_STATUSES,
        &["tournament_id", "created_at"],
        "tournament_status_history_idx",
        false,
    ),
    (
        JOIN_REQUESTS,
        &["tournament_id", "user_id"],
        "join_request_pair_idx",
        true,
    ),
    (
        PARTICIPANTS,
        &["tournament_id", "user_id"],
        "participant_pair_idx",
        true,
    ),
    (TEAMS, &["tournament_id", "name"], "team_name_idx", true),
    (TEAM_MEMBERS, &["user_id", "team_id"], "team_member_pair_idx", true),
    (
        NOTIFICATIONS,
        &["user_id", "created_at"],
        "notification_user_idx",
        false,
    ),
];

#[derive(Clone)]
pub struct MongoArenaStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoArenaStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.database().await;
        for &(collection, keys, name, unique) in INDEXES {
            let mut key_doc = Document::new();
            for key in keys {
                key_doc.insert(*key, 1);
            }
            let index = IndexModel::builder()
                .keys(key_doc)
                .options(
                    IndexOptions::builder()
                        .name(Some(name.to_owned()))
                        .unique(Some(unique))
                        .build(),
                )
                .build();

            database
                .collection::<Document>(collection)
                .create_index(index)
                .await
                .map_err(|source| MongoDaoError::EnsureIndex {
                    collection,
                    index: name,
                    source,
                })?;
        }
        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn client(&self) -> Client {
        let guard = self.inner.state.read().await;
        guard.client.clone()
    }

    async fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        let guard = self.inner.state.read().await;
        guard.database.collection::<T>(name)
    }

    async fn raw(&self, name: &str) -> Collection<Document> {
        self.collection::<Document>(name).await
    }

    async fn insert<D>(&self, name: &'static str, document: D) -> MongoResult<()>
    where
        D: Serialize + Send + Sync,
    {
        self.collection::<D>(name)
            .await
            .insert_one(document)
            .await
            .map_err(MongoDaoError::op("insert document", name))?;
        Ok(())
    }

    async fn replace<D>(&self, name: &'static str, id: Uuid, document: D) -> MongoResult<bool>
    where
        D: Serialize + Send + Sync,
    {
        let result = self
            .collection::<D>(name)
            .await
            .replace_one(doc_id(id), document)
            .await
            .map_err(MongoDaoError::op("replace document", name))?;
        Ok(result.matched_count > 0)
    }

    async fn find_one<D, E>(&self, name: &'static str, filter: Document) -> MongoResult<Option<E>>
    where
        D: DeserializeOwned + Send + Sync,
        E: TryFrom<D, Error = MongoDaoError>,
    {
        self.collection::<D>(name)
            .await
            .find_one(filter)
            .await
            .map_err(MongoDaoError::op("find document", name))?
            .map(E::try_from)
            .transpose()
    }

    async fn find_many<D, E>(
        &self,
        name: &'static str,
        filter: Document,
        sort: Option<Document>,
        limit: Option<i64>,
    ) -> MongoResult<Vec<E>>
    where
        D: DeserializeOwned + Send + Sync,
        E: TryFrom<D, Error = MongoDaoError>,
    {
        let collection = self.collection::<D>(name).await;
        let mut action = collection.find(filter);
        if let Some(sort) = sort {
            action = action.sort(sort);
        }
        if let Some(limit) = limit {
            action = action.limit(limit);
        }
        let documents: Vec<D> = action
            .await
            .map_err(MongoDaoError::op("list documents", name))?
            .try_collect()
            .await
            .map_err(MongoDaoError::op("list documents", name))?;

        documents.into_iter().map(E::try_from).collect()
    }

    async fn update_one(
        &self,
        name: &'static str,
        filter: Document,
        update: Document,
    ) -> MongoResult<bool> {
        let result = self
            .raw(name)
            .await
            .update_one(filter, update)
            .await
            .map_err(MongoDaoError::op("update document", name))?;
        Ok(result.matched_count > 0)
    }

    async fn delete_one(&self, name: &'static str, filter: Document) -> MongoResult<bool> {
        let result = self
            .raw(name)
            .await
            .delete_one(filter)
            .await
            .map_err(MongoDaoError::op("delete document", name))?;
        Ok(result.deleted_count > 0)
    }

    async fn count(&self, name: &'static str, filter: Document) -> MongoResult<u64> {
        self.raw(name)
            .await
            .count_documents(filter)
            .await
            .map_err(MongoDaoError::op("count documents", name))
    }

    /// Run `work` inside a multi-document transaction, committing on success and
    /// aborting on failure.
    async fn in_transaction<T, F>(&self, operation: &'static str, work: F) -> MongoResult<T>
    where
        F: for<'s> FnOnce(&'s mut ClientSession) -> BoxFuture<'s, MongoResult<T>>,
    {
        let tx_err = |source| MongoDaoError::Transaction { operation, source };
        let client = self.client().await;
        let mut session = client.start_session().await.map_err(tx_err)?;
        session.start_transaction().await.map_err(tx_err)?;

        match work(&mut session).await {
            Ok(value) => {
                session.commit_transaction().await.map_err(tx_err)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(abort_err) = session.abort_transaction().await {
                    warn!(operation, error = %abort_err, "failed to abort MongoDB transaction");
                }
                Err(err)
            }
        }
    }

    async fn delete_many_in(
        &self,
        session: &mut ClientSession,
        name: &'static str,
        filter: Document,
    ) -> MongoResult<u64> {
        let result = self
            .raw(name)
            .await
            .delete_many(filter)
            .session(&mut *session)
            .await
            .map_err(MongoDaoError::op("delete documents", name))?;
        Ok(result.deleted_count)
    }

    async fn delete_tournament_in(
        &self,
        session: &mut ClientSession,
        id: Uuid,
    ) -> MongoResult<bool> {
        let deleted = self
            .raw(TOURNAMENTS)
            .await
            .delete_one(doc_id(id))
            .session(&mut *session)
            .await
            .map_err(MongoDaoError::op("delete tournament", TOURNAMENTS))?;
        if deleted.deleted_count == 0 {
            return Ok(false);
        }

        let id = id.to_string();
        let team_ids: Vec<Bson> = self
            .raw(TEAMS)
            .await
            .distinct("_id", doc! { "tournament_id": &id })
            .session(&mut *session)
            .await
            .map_err(MongoDaoError::op("list tournament teams", TEAMS))?;

        self.delete_many_in(session, TEAM_MEMBERS, doc! { "team_id": { "$in": team_ids } })
            .await?;
        for collection in [TEAMS, PARTICIPANTS, JOIN_REQUESTS, TOURNAMENT_STATUSES] {
            self.delete_many_in(session, collection, doc! { "tournament_id": &id })
                .await?;
        }
        Ok(true)
    }

    async fn delete_user_in(&self, session: &mut ClientSession, id: Uuid) -> MongoResult<bool> {
        let deleted = self
            .raw(USERS)
            .await
            .delete_one(doc_id(id))
            .session(&mut *session)
            .await
            .map_err(MongoDaoError::op("delete user", USERS))?;
        if deleted.deleted_count == 0 {
            return Ok(false);
        }

        let id = id.to_string();
        for collection in [JOIN_REQUESTS, PARTICIPANTS, TEAM_MEMBERS, NOTIFICATIONS] {
            self.delete_many_in(session, collection, doc! { "user_id": &id })
                .await?;
        }
        self.delete_many_in(
            session,
            MESSAGES,
            doc! { "$or": [ { "sender_id": &id }, { "recipient_id": &id } ] },
        )
        .await?;
        Ok(true)
    }

    async fn delete_team_in(&self, session: &mut ClientSession, id: Uuid) -> MongoResult<bool> {
        let deleted = self
            .raw(TEAMS)
            .await
            .delete_one(doc_id(id))
            .session(&mut *session)
            .await
            .map_err(MongoDaoError::op("delete team", TEAMS))?;
        if deleted.deleted_count == 0 {
            return Ok(false);
        }
        self.delete_many_in(session, TEAM_MEMBERS, doc! { "team_id": id.to_string() })
            .await?;
        Ok(true)
    }

    async fn delete_participant_in(
        &self,
        session: &mut ClientSession,
        tournament_id: Uuid,
        user_id: Uuid,
    ) -> MongoResult<bool> {
        let tournament_id = tournament_id.to_string();
        let user_id = user_id.to_string();
        let deleted = self
            .raw(PARTICIPANTS)
            .await
            .delete_one(doc! { "tournament_id": &tournament_id, "user_id": &user_id })
            .session(&mut *session)
            .await
            .map_err(MongoDaoError::op("delete participant", PARTICIPANTS))?;
        if deleted.deleted_count == 0 {
            return Ok(false);
        }

        let captained: Vec<Bson> = self
            .raw(TEAMS)
            .await
            .distinct(
                "_id",
                doc! { "tournament_id": &tournament_id, "captain_id": &user_id },
            )
            .session(&mut *session)
            .await
            .map_err(MongoDaoError::op("list captained teams", TEAMS))?;
        self.delete_many_in(
            session,
            TEAM_MEMBERS,
            doc! { "team_id": { "$in": captained.clone() } },
        )
        .await?;
        self.delete_many_in(session, TEAMS, doc! { "_id": { "$in": captained } })
            .await?;

        let team_ids: Vec<Bson> = self
            .raw(TEAMS)
            .await
            .distinct("_id", doc! { "tournament_id": &tournament_id })
            .session(&mut *session)
            .await
            .map_err(MongoDaoError::op("list tournament teams", TEAMS))?;
        self.delete_many_in(
            session,
            TEAM_MEMBERS,
            doc! { "user_id": &user_id, "team_id": { "$in": team_ids } },
        )
        .await?;
        Ok(true)
    }

    async fn insert_pair_in<A, B>(
        &self,
        session: &mut ClientSession,
        first: (&'static str, A),
        second: (&'static str, B),
    ) -> MongoResult<()>
    where
        A: Serialize + Send + Sync,
        B: Serialize + Send + Sync,
    {
        let (first_name, first_doc) = first;
        self.collection::<A>(first_name)
            .await
            .insert_one(first_doc)
            .session(&mut *session)
            .await
            .map_err(MongoDaoError::op("insert document", first_name))?;
        let (second_name, second_doc) = second;
        self.collection::<B>(second_name)
            .await
            .insert_one(second_doc)
            .session(&mut *session)
            .await
            .map_err(MongoDaoError::op("insert document", second_name))?;
        Ok(())
    }

    /// Box a store operation for the [`ArenaStore`] trait, converting the error type.
    fn run<T, F, Fut>(&self, work: F) -> BoxFuture<'static, StorageResult<T>>
    where
        F: FnOnce(Self) -> Fut + Send + 'static,
        Fut: Future<Output = MongoResult<T>> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.clone();
        Box::pin(async move { work(store).await.map_err(Into::into) })
    }
}

fn by_id_field(field: &str, id: Uuid) -> Document {
    let mut filter = Document::new();
    filter.insert(field, id.to_string());
    filter
}

fn newest_first() -> Option<Document> {
    Some(doc! { "created_at": -1 })
}

impl ArenaStore for MongoArenaStore {
    fn insert_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.run(move |s| async move { s.insert(USERS, UserDocument::from(user)).await })
    }

    fn find_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        self.run(move |s| async move { s.find_one::<UserDocument, _>(USERS, doc_id(id)).await })
    }

    fn find_user_by_email(
        &self,
        email: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        self.run(move |s| async move {
            s.find_one::<UserDocument, _>(USERS, doc! { "email": email })
                .await
        })
    }

    fn list_users(&self) -> BoxFuture<'static, StorageResult<Vec<UserEntity>>> {
        self.run(|s| async move {
            s.find_many::<UserDocument, _>(USERS, doc! {}, Some(doc! { "created_at": 1 }), None)
                .await
        })
    }

    fn count_users(&self) -> BoxFuture<'static, StorageResult<u64>> {
        self.run(|s| async move { s.count(USERS, doc! {}).await })
    }

    fn update_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<bool>> {
        self.run(move |s| async move {
            s.replace(USERS, user.id, UserDocument::from(user)).await
        })
    }

    fn delete_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        self.run(move |s| async move {
            let store = s.clone();
            s.in_transaction("delete user", move |session| {
                Box::pin(async move { store.delete_user_in(session, id).await })
            })
            .await
        })
    }

    fn insert_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.run(move |s| async move { s.insert(GAMES, GameDocument::from(game)).await })
    }

    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        self.run(move |s| async move { s.find_one::<GameDocument, _>(GAMES, doc_id(id)).await })
    }

    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        self.run(|s| async move {
            s.find_many::<GameDocument, _>(GAMES, doc! {}, Some(doc! { "name": 1 }), None)
                .await
        })
    }

    fn update_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<bool>> {
        self.run(move |s| async move {
            s.replace(GAMES, game.id, GameDocument::from(game)).await
        })
    }

    fn delete_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        self.run(move |s| async move { s.delete_one(GAMES, doc_id(id)).await })
    }

    fn insert_tournament_type(
        &self,
        kind: TournamentTypeEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.run(move |s| async move {
            s.insert(TOURNAMENT_TYPES, TournamentTypeDocument::from(kind))
                .await
        })
    }

    fn find_tournament_type(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<TournamentTypeEntity>>> {
        self.run(move |s| async move {
            s.find_one::<TournamentTypeDocument, _>(TOURNAMENT_TYPES, doc_id(id))
                .await
        })
    }

    fn list_tournament_types(&self) -> BoxFuture<'static, StorageResult<Vec<TournamentTypeEntity>>> {
        self.run(|s| async move {
            s.find_many::<TournamentTypeDocument, _>(
                TOURNAMENT_TYPES,
                doc! {},
                Some(doc! { "name": 1 }),
                None,
            )
            .await
        })
    }

    fn delete_tournament_type(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        self.run(move |s| async move { s.delete_one(TOURNAMENT_TYPES, doc_id(id)).await })
    }

    fn insert_tournament(
        &self,
        tournament: TournamentEntity,
        initial_status: TournamentStatusEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.run(move |s| async move {
            let store = s.clone();
            s.in_transaction("create tournament", move |session| {
                Box::pin(async move {
                    store
                        .insert_pair_in(
                            session,
                            (TOURNAMENTS, TournamentDocument::from(tournament)),
                            (
                                TOURNAMENT_STATUSES,
                                TournamentStatusDocument::from(initial_status),
                            ),
                        )
                        .await
                })
            })
            .await
        })
    }

    fn find_tournament(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<TournamentEntity>>> {
        self.run(move |s| async move {
            s.find_one::<TournamentDocument, _>(TOURNAMENTS, doc_id(id))
                .await
        })
    }

    fn list_tournaments(
        &self,
        filter: TournamentFilter,
    ) -> BoxFuture<'static, StorageResult<Vec<TournamentEntity>>> {
        self.run(move |s| async move {
            let mut query = Document::new();
            if let Some(id) = filter.game_id {
                query.insert("game_id", id.to_string());
            }
            if let Some(id) = filter.creator_id {
                query.insert("creator_id", id.to_string());
            }
            if let Some(id) = filter.tournament_type_id {
                query.insert("tournament_type_id", id.to_string());
            }
            s.find_many::<TournamentDocument, _>(TOURNAMENTS, query, newest_first(), None)
                .await
        })
    }

    fn update_tournament(
        &self,
        tournament: TournamentEntity,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        self.run(move |s| async move {
            s.replace(
                TOURNAMENTS,
                tournament.id,
                TournamentDocument::from(tournament),
            )
            .await
        })
    }

    fn delete_tournament(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        self.run(move |s| async move {
            let store = s.clone();
            s.in_transaction("delete tournament", move |session| {
                Box::pin(async move { store.delete_tournament_in(session, id).await })
            })
            .await
        })
    }

    fn insert_tournament_status(
        &self,
        status: TournamentStatusEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.run(move |s| async move {
            s.insert(TOURNAMENT_STATUSES, TournamentStatusDocument::from(status))
                .await
        })
    }

    fn list_tournament_statuses(
        &self,
        tournament_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<TournamentStatusEntity>>> {
        self.run(move |s| async move {
            s.find_many::<TournamentStatusDocument, _>(
                TOURNAMENT_STATUSES,
                by_id_field("tournament_id", tournament_id),
                Some(doc! { "created_at": 1 }),
                None,
            )
            .await
        })
    }

    fn insert_join_request(
        &self,
        request: JoinRequestEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.run(move |s| async move {
            s.insert(JOIN_REQUESTS, JoinRequestDocument::from(request))
                .await
        })
    }

    fn find_join_request(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<JoinRequestEntity>>> {
        self.run(move |s| async move {
            s.find_one::<JoinRequestDocument, _>(JOIN_REQUESTS, doc_id(id))
                .await
        })
    }

    fn find_join_request_for(
        &self,
        tournament_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<JoinRequestEntity>>> {
        self.run(move |s| async move {
            s.find_one::<JoinRequestDocument, _>(
                JOIN_REQUESTS,
                doc! {
                    "tournament_id": tournament_id.to_string(),
                    "user_id": user_id.to_string(),
                },
            )
            .await
        })
    }

    fn list_join_requests(
        &self,
        filter: JoinRequestFilter,
    ) -> BoxFuture<'static, StorageResult<Vec<JoinRequestEntity>>> {
        self.run(move |s| async move {
            let mut query = Document::new();
            if let Some(id) = filter.tournament_id {
                query.insert("tournament_id", id.to_string());
            }
            if let Some(id) = filter.user_id {
                query.insert("user_id", id.to_string());
            }
            if let Some(status) = filter.status {
                query.insert("status", status.as_str());
            }
            s.find_many::<JoinRequestDocument, _>(
                JOIN_REQUESTS,
                query,
                Some(doc! { "created_at": 1 }),
                None,
            )
            .await
        })
    }

    fn update_join_request_status(
        &self,
        id: Uuid,
        status: JoinRequestStatus,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        self.run(move |s| async move {
            s.update_one(
                JOIN_REQUESTS,
                doc_id(id),
                doc! { "$set": { "status": status.as_str(), "updated_at": DateTime::now() } },
            )
            .await
        })
    }

    fn delete_join_request(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        self.run(move |s| async move { s.delete_one(JOIN_REQUESTS, doc_id(id)).await })
    }

    fn insert_participant(
        &self,
        participant: ParticipantEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.run(move |s| async move {
            s.insert(PARTICIPANTS, ParticipantDocument::from(participant))
                .await
        })
    }

    fn find_participant(
        &self,
        tournament_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<ParticipantEntity>>> {
        self.run(move |s| async move {
            s.find_one::<ParticipantDocument, _>(
                PARTICIPANTS,
                doc! {
                    "tournament_id": tournament_id.to_string(),
                    "user_id": user_id.to_string(),
                },
            )
            .await
        })
    }

    fn list_participants(
        &self,
        tournament_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<ParticipantEntity>>> {
        self.run(move |s| async move {
            s.find_many::<ParticipantDocument, _>(
                PARTICIPANTS,
                by_id_field("tournament_id", tournament_id),
                Some(doc! { "created_at": 1 }),
                None,
            )
            .await
        })
    }

    fn count_participants(&self, tournament_id: Uuid) -> BoxFuture<'static, StorageResult<u64>> {
        self.run(move |s| async move {
            s.count(PARTICIPANTS, by_id_field("tournament_id", tournament_id))
                .await
        })
    }

    fn delete_participant(
        &self,
        tournament_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        self.run(move |s| async move {
            let store = s.clone();
            s.in_transaction("delete participant", move |session| {
                Box::pin(async move {
                    store
                        .delete_participant_in(session, tournament_id, user_id)
                        .await
                })
            })
            .await
        })
    }

    fn insert_team(
        &self,
        team: TeamEntity,
        captain: TeamMemberEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.run(move |s| async move {
            let store = s.clone();
            s.in_transaction("create team", move |session| {
                Box::pin(async move {
                    store
                        .insert_pair_in(
                            session,
                            (TEAMS, TeamDocument::from(team)),
                            (TEAM_MEMBERS, TeamMemberDocument::from(captain)),
                        )
                        .await
                })
            })
            .await
        })
    }

    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        self.run(move |s| async move { s.find_one::<TeamDocument, _>(TEAMS, doc_id(id)).await })
    }

    fn list_teams(
        &self,
        tournament_id: Option<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        self.run(move |s| async move {
            let query = match tournament_id {
                Some(id) => by_id_field("tournament_id", id),
                None => doc! {},
            };
            s.find_many::<TeamDocument, _>(TEAMS, query, Some(doc! { "created_at": 1 }), None)
                .await
        })
    }

    fn rename_team(&self, id: Uuid, name: String) -> BoxFuture<'static, StorageResult<bool>> {
        self.run(move |s| async move {
            s.update_one(TEAMS, doc_id(id), doc! { "$set": { "name": name } })
                .await
        })
    }

    fn delete_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        self.run(move |s| async move {
            let store = s.clone();
            s.in_transaction("delete team", move |session| {
                Box::pin(async move { store.delete_team_in(session, id).await })
            })
            .await
        })
    }

    fn insert_team_member(
        &self,
        member: TeamMemberEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.run(move |s| async move {
            s.insert(TEAM_MEMBERS, TeamMemberDocument::from(member))
                .await
        })
    }

    fn find_team_member(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<TeamMemberEntity>>> {
        self.run(move |s| async move {
            s.find_one::<TeamMemberDocument, _>(
                TEAM_MEMBERS,
                doc! { "team_id": team_id.to_string(), "user_id": user_id.to_string() },
            )
            .await
        })
    }

    fn list_team_members(
        &self,
        team_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<TeamMemberEntity>>> {
        self.run(move |s| async move {
            s.find_many::<TeamMemberDocument, _>(
                TEAM_MEMBERS,
                by_id_field("team_id", team_id),
                Some(doc! { "created_at": 1 }),
                None,
            )
            .await
        })
    }

    fn list_user_memberships(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<TeamMemberEntity>>> {
        self.run(move |s| async move {
            s.find_many::<TeamMemberDocument, _>(
                TEAM_MEMBERS,
                by_id_field("user_id", user_id),
                None,
                None,
            )
            .await
        })
    }

    fn update_team_member_role(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        role: TeamRole,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        self.run(move |s| async move {
            s.update_one(
                TEAM_MEMBERS,
                doc! { "team_id": team_id.to_string(), "user_id": user_id.to_string() },
                doc! { "$set": { "role": role.as_str() } },
            )
            .await
        })
    }

    fn delete_team_member(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        self.run(move |s| async move {
            s.delete_one(
                TEAM_MEMBERS,
                doc! { "team_id": team_id.to_string(), "user_id": user_id.to_string() },
            )
            .await
        })
    }

    fn insert_notifications(
        &self,
        notifications: Vec<NotificationEntity>,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.run(move |s| async move {
            if notifications.is_empty() {
                return Ok(());
            }
            let documents: Vec<NotificationDocument> =
                notifications.into_iter().map(Into::into).collect();
            s.collection::<NotificationDocument>(NOTIFICATIONS)
                .await
                .insert_many(documents)
                .await
                .map_err(MongoDaoError::op("insert notifications", NOTIFICATIONS))?;
            Ok(())
        })
    }

    fn list_notifications(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<NotificationEntity>>> {
        self.run(move |s| async move {
            let mut query = by_id_field("user_id", user_id);
            if unread_only {
                query.insert("is_read", false);
            }
            let limit = i64::try_from(limit).unwrap_or(i64::MAX);
            s.find_many::<NotificationDocument, _>(NOTIFICATIONS, query, newest_first(), Some(limit))
                .await
        })
    }

    fn count_unread_notifications(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        self.run(move |s| async move {
            s.count(
                NOTIFICATIONS,
                doc! { "user_id": user_id.to_string(), "is_read": false },
            )
            .await
        })
    }

    fn mark_notification_read(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        self.run(move |s| async move {
            s.update_one(
                NOTIFICATIONS,
                doc! { "_id": id.to_string(), "user_id": user_id.to_string() },
                doc! { "$set": { "is_read": true } },
            )
            .await
        })
    }

    fn mark_all_notifications_read(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        self.run(move |s| async move {
            let result = s
                .raw(NOTIFICATIONS)
                .await
                .update_many(
                    doc! { "user_id": user_id.to_string(), "is_read": false },
                    doc! { "$set": { "is_read": true } },
                )
                .await
                .map_err(MongoDaoError::op("mark notifications read", NOTIFICATIONS))?;
            Ok(result.modified_count)
        })
    }

    fn delete_notification(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        self.run(move |s| async move {
            s.delete_one(
                NOTIFICATIONS,
                doc! { "_id": id.to_string(), "user_id": user_id.to_string() },
            )
            .await
        })
    }

    fn insert_contact(&self, contact: ContactEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.run(move |s| async move { s.insert(CONTACTS, ContactDocument::from(contact)).await })
    }

    fn list_contacts(&self) -> BoxFuture<'static, StorageResult<Vec<ContactEntity>>> {
        self.run(|s| async move {
            s.find_many::<ContactDocument, _>(CONTACTS, doc! {}, newest_first(), None)
                .await
        })
    }

    fn update_contact_status(
        &self,
        id: Uuid,
        status: ContactStatus,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        self.run(move |s| async move {
            s.update_one(
                CONTACTS,
                doc_id(id),
                doc! { "$set": { "status": status.as_str() } },
            )
            .await
        })
    }

    fn delete_contact(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        self.run(move |s| async move { s.delete_one(CONTACTS, doc_id(id)).await })
    }

    fn insert_message(&self, message: MessageEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.run(move |s| async move { s.insert(MESSAGES, MessageDocument::from(message)).await })
    }

    fn find_message(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MessageEntity>>> {
        self.run(move |s| async move {
            s.find_one::<MessageDocument, _>(MESSAGES, doc_id(id))
                .await
        })
    }

    fn list_messages(
        &self,
        filter: MessageFilter,
    ) -> BoxFuture<'static, StorageResult<Vec<MessageEntity>>> {
        self.run(move |s| async move {
            let mut query = Document::new();
            if let Some(id) = filter.sender_id {
                query.insert("sender_id", id.to_string());
            }
            if let Some(id) = filter.recipient_id {
                query.insert("recipient_id", id.to_string());
            }
            s.find_many::<MessageDocument, _>(MESSAGES, query, newest_first(), None)
                .await
        })
    }

    fn mark_message_read(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        self.run(move |s| async move {
            s.update_one(MESSAGES, doc_id(id), doc! { "$set": { "is_read": true } })
                .await
        })
    }

    fn delete_message(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        self.run(move |s| async move { s.delete_one(MESSAGES, doc_id(id)).await })
    }

    fn stats(&self) -> BoxFuture<'static, StorageResult<StatsEntity>> {
        self.run(|s| async move {
            Ok(StatsEntity {
                users: s.count(USERS, doc! {}).await?,
                games: s.count(GAMES, doc! {}).await?,
                tournaments: s.count(TOURNAMENTS, doc! {}).await?,
                teams: s.count(TEAMS, doc! {}).await?,
                pending_join_requests: s
                    .count(
                        JOIN_REQUESTS,
                        doc! { "status": JoinRequestStatus::Pending.as_str() },
                    )
                    .await?,
                new_contacts: s
                    .count(CONTACTS, doc! { "status": ContactStatus::New.as_str() })
                    .await?,
            })
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        self.run(|s| async move { s.inner.ping().await })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        self.run(|s| async move { s.inner.reconnect().await })
    }
}
