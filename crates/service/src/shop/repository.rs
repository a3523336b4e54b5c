use async_trait::async_trait;

use super::domain::{Shop, ShopFilter};
use super::errors::ShopOperationError;

/// Shop persistence operations, available both outside and inside a transaction.
#[async_trait]
pub trait ShopStore: Send + Sync {
    /// Insert a draft; on success the generated id is written back to `shop.shop_id`.
    async fn insert_shop(&self, shop: &mut Shop) -> Result<u64, ShopOperationError>;
    /// Write the fields present on `shop` to the row identified by `shop.shop_id`.
    async fn update_shop(&self, shop: &Shop) -> Result<u64, ShopOperationError>;
    async fn query_by_shop_id(&self, shop_id: i64) -> Result<Option<Shop>, ShopOperationError>;
    async fn query_shop_list(&self, filter: &ShopFilter, row_offset: u64, page_size: u64) -> Result<Vec<Shop>, ShopOperationError>;
    async fn query_shop_count(&self, filter: &ShopFilter) -> Result<u64, ShopOperationError>;
}

/// A unit of work; writes become durable only after `commit`.
#[async_trait]
pub trait ShopTransaction: ShopStore {
    async fn commit(self: Box<Self>) -> Result<(), ShopOperationError>;
    async fn rollback(self: Box<Self>) -> Result<(), ShopOperationError>;
}

/// Repository abstraction for shop persistence.
#[async_trait]
pub trait ShopRepository: ShopStore {
    async fn begin(&self) -> Result<Box<dyn ShopTransaction>, ShopOperationError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct MockState {
        rows: BTreeMap<i64, Shop>,
        next_id: i64,
        category_parents: HashMap<i64, i64>,
        calls: Vec<&'static str>,
        insert_rows: Option<u64>,
        update_rows: Option<u64>,
        fail_list: bool,
        fail_count: bool,
    }

    /// In-memory repository; transactions work on a staged copy of the rows.
    #[derive(Default, Clone)]
    pub struct MockShopRepository {
        state: Arc<Mutex<MockState>>,
    }

    impl MockShopRepository {
        /// Force the affected-row count reported by inserts (0 skips the write).
        pub fn set_insert_rows(&self, rows: u64) { self.state.lock().unwrap().insert_rows = Some(rows); }

        /// Force the affected-row count reported by updates (0 skips the write).
        pub fn set_update_rows(&self, rows: u64) { self.state.lock().unwrap().update_rows = Some(rows); }

        pub fn fail_list_queries(&self) { self.state.lock().unwrap().fail_list = true; }

        pub fn fail_count_queries(&self) { self.state.lock().unwrap().fail_count = true; }

        pub fn set_category_parent(&self, child: i64, parent: i64) {
            self.state.lock().unwrap().category_parents.insert(child, parent);
        }

        /// Store a row directly, bypassing call recording.
        pub fn seed(&self, shop: Shop) -> i64 {
            let mut st = self.state.lock().unwrap();
            st.next_id += 1;
            let id = shop.shop_id.unwrap_or(st.next_id);
            st.next_id = st.next_id.max(id);
            st.rows.insert(id, Shop { shop_id: Some(id), ..shop });
            id
        }

        /// Committed rows.
        pub fn rows(&self) -> Vec<Shop> { self.state.lock().unwrap().rows.values().cloned().collect() }

        /// Names of the operations invoked so far, in order.
        pub fn calls(&self) -> Vec<&'static str> { self.state.lock().unwrap().calls.clone() }

        fn record(&self, call: &'static str) { self.state.lock().unwrap().calls.push(call); }
    }

    fn merge(stored: &mut Shop, patch: &Shop) {
        if patch.area_id.is_some() { stored.area_id = patch.area_id; }
        if patch.shop_category_id.is_some() { stored.shop_category_id = patch.shop_category_id; }
        if patch.shop_name.is_some() { stored.shop_name = patch.shop_name.clone(); }
        if patch.shop_desc.is_some() { stored.shop_desc = patch.shop_desc.clone(); }
        if patch.shop_addr.is_some() { stored.shop_addr = patch.shop_addr.clone(); }
        if patch.phone.is_some() { stored.phone = patch.phone.clone(); }
        if patch.shop_img.is_some() { stored.shop_img = patch.shop_img.clone(); }
        if patch.enable_status.is_some() { stored.enable_status = patch.enable_status; }
        if patch.advice.is_some() { stored.advice = patch.advice.clone(); }
        if patch.last_edit_time.is_some() { stored.last_edit_time = patch.last_edit_time; }
    }

    fn matches(shop: &Shop, f: &ShopFilter, parents: &HashMap<i64, i64>) -> bool {
        f.owner_id.map_or(true, |v| shop.owner_id == Some(v))
            && f.area_id.map_or(true, |v| shop.area_id == Some(v))
            && f.shop_category_id.map_or(true, |v| shop.shop_category_id == Some(v))
            && f.parent_category_id.map_or(true, |p| {
                shop.shop_category_id.and_then(|c| parents.get(&c)).copied() == Some(p)
            })
            && f.enable_status.map_or(true, |v| shop.enable_status == Some(v))
            && f.shop_name.as_deref().map_or(true, |n| {
                shop.shop_name.as_deref().is_some_and(|s| s.contains(n))
            })
    }

    /// Shared row logic; `next_id` lives in the committed state so ids never repeat.
    fn insert_into(st: &mut MockState, rows: &mut BTreeMap<i64, Shop>, shop: &mut Shop) -> u64 {
        if st.insert_rows == Some(0) { return 0; }
        st.next_id += 1;
        let id = st.next_id;
        shop.shop_id = Some(id);
        rows.insert(id, shop.clone());
        st.insert_rows.unwrap_or(1)
    }

    fn update_in(st: &MockState, rows: &mut BTreeMap<i64, Shop>, shop: &Shop) -> Result<u64, ShopOperationError> {
        let id = shop.shop_id.ok_or_else(|| ShopOperationError::Validation("shop_id required for update".into()))?;
        if st.update_rows == Some(0) { return Ok(0); }
        match rows.get_mut(&id) {
            Some(stored) => { merge(stored, shop); Ok(st.update_rows.unwrap_or(1)) }
            None => Ok(0),
        }
    }

    fn list_from(st: &MockState, rows: &BTreeMap<i64, Shop>, f: &ShopFilter, offset: u64, size: u64) -> Result<Vec<Shop>, ShopOperationError> {
        if st.fail_list { return Err(ShopOperationError::Repository("list query failed".into())); }
        Ok(rows.values()
            .filter(|s| matches(s, f, &st.category_parents))
            .skip(offset as usize)
            .take(size as usize)
            .cloned()
            .collect())
    }

    fn count_from(st: &MockState, rows: &BTreeMap<i64, Shop>, f: &ShopFilter) -> Result<u64, ShopOperationError> {
        if st.fail_count { return Err(ShopOperationError::Repository("count query failed".into())); }
        Ok(rows.values().filter(|s| matches(s, f, &st.category_parents)).count() as u64)
    }

    #[async_trait]
    impl ShopStore for MockShopRepository {
        async fn insert_shop(&self, shop: &mut Shop) -> Result<u64, ShopOperationError> {
            self.record("insert_shop");
            let mut st = self.state.lock().unwrap();
            let mut rows = std::mem::take(&mut st.rows);
            let n = insert_into(&mut st, &mut rows, shop);
            st.rows = rows;
            Ok(n)
        }

        async fn update_shop(&self, shop: &Shop) -> Result<u64, ShopOperationError> {
            self.record("update_shop");
            let mut st = self.state.lock().unwrap();
            let mut rows = std::mem::take(&mut st.rows);
            let n = update_in(&st, &mut rows, shop);
            st.rows = rows;
            n
        }

        async fn query_by_shop_id(&self, shop_id: i64) -> Result<Option<Shop>, ShopOperationError> {
            self.record("query_by_shop_id");
            Ok(self.state.lock().unwrap().rows.get(&shop_id).cloned())
        }

        async fn query_shop_list(&self, filter: &ShopFilter, row_offset: u64, page_size: u64) -> Result<Vec<Shop>, ShopOperationError> {
            self.record("query_shop_list");
            let st = self.state.lock().unwrap();
            list_from(&st, &st.rows, filter, row_offset, page_size)
        }

        async fn query_shop_count(&self, filter: &ShopFilter) -> Result<u64, ShopOperationError> {
            self.record("query_shop_count");
            let st = self.state.lock().unwrap();
            count_from(&st, &st.rows, filter)
        }
    }

    #[async_trait]
    impl ShopRepository for MockShopRepository {
        async fn begin(&self) -> Result<Box<dyn ShopTransaction>, ShopOperationError> {
            self.record("begin");
            let staged = self.state.lock().unwrap().rows.clone();
            Ok(Box::new(MockShopTransaction { repo: self.clone(), staged: Mutex::new(staged) }))
        }
    }

    /// Transaction over a private copy of the rows, published on commit.
    pub struct MockShopTransaction {
        repo: MockShopRepository,
        staged: Mutex<BTreeMap<i64, Shop>>,
    }

    #[async_trait]
    impl ShopStore for MockShopTransaction {
        async fn insert_shop(&self, shop: &mut Shop) -> Result<u64, ShopOperationError> {
            self.repo.record("insert_shop");
            let mut st = self.repo.state.lock().unwrap();
            let mut staged = self.staged.lock().unwrap();
            Ok(insert_into(&mut st, &mut staged, shop))
        }

        async fn update_shop(&self, shop: &Shop) -> Result<u64, ShopOperationError> {
            self.repo.record("update_shop");
            let st = self.repo.state.lock().unwrap();
            let mut staged = self.staged.lock().unwrap();
            update_in(&st, &mut staged, shop)
        }

        async fn query_by_shop_id(&self, shop_id: i64) -> Result<Option<Shop>, ShopOperationError> {
            self.repo.record("query_by_shop_id");
            Ok(self.staged.lock().unwrap().get(&shop_id).cloned())
        }

        async fn query_shop_list(&self, filter: &ShopFilter, row_offset: u64, page_size: u64) -> Result<Vec<Shop>, ShopOperationError> {
            self.repo.record("query_shop_list");
            let st = self.repo.state.lock().unwrap();
            let staged = self.staged.lock().unwrap();
            list_from(&st, &staged, filter, row_offset, page_size)
        }

        async fn query_shop_count(&self, filter: &ShopFilter) -> Result<u64, ShopOperationError> {
            self.repo.record("query_shop_count");
            let st = self.repo.state.lock().unwrap();
            let staged = self.staged.lock().unwrap();
            count_from(&st, &staged, filter)
        }
    }

    #[async_trait]
    impl ShopTransaction for MockShopTransaction {
        async fn commit(self: Box<Self>) -> Result<(), ShopOperationError> {
            let this = *self;
            this.repo.record("commit");
            let staged = this.staged.into_inner().unwrap();
            this.repo.state.lock().unwrap().rows = staged;
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> Result<(), ShopOperationError> {
            self.repo.record("rollback");
            Ok(())
        }
    }
}
