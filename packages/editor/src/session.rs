//! # Edit Session
//!
//! The editing state machine for one open document.
//!
//! An `EditSession` turns block-tagged input events into mutations,
//! records every committed page in the history, and hands settled pages
//! to the persistence sink. The page itself is always the history's
//! present snapshot.
//!
//! ```text
//! InputEvent ──► EditSession ──► Mutation::apply ──► History ──► page()
//!                   │   ▲                               │
//!                   │   └── FocusHint / Notification    └──► SyncScheduler ──► PersistenceSink
//!                   └──► Selection / SlashMenu / Clipboard
//! ```
//!
//! Mode per session: editing text, navigating (block selection active)
//! or menu open (slash menu showing for the focused block).

use crate::autoformat;
use crate::clipboard::{self, ClipboardError, ClipboardHolder, MemoryClipboard, SystemClipboard};
use crate::config::EditorConfig;
use crate::events::{Command, EditMode, EventOutcome, InputEvent, Key, Modifiers, Notification, TextCursor};
use crate::history::{History, LogicalClock};
use crate::keymap::{self, KeyAction};
use crate::link;
use crate::mutations::{FocusHint, Mutation};
use crate::selection::Selection;
use crate::slash_menu::{self, SlashCommand, SlashMenu};
use crate::sync::{PersistenceSink, SyncError, SyncScheduler};
use crate::text;
use crate::EditorError;
use quire_model::{Block, BlockId, BlockKind, Page};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info, warn};

pub struct EditSession {
    document_id: String,
    document_url: String,
    config: EditorConfig,

    /// Committed pages; the present entry is the current page
    history: History,
    clock: LogicalClock,

    selection: Selection,
    slash_menu: Option<SlashMenu>,

    /// Block holding the caret
    focused: Option<BlockId>,

    /// Next caret placement for the rendering layer, consumed once
    focus_hint: Option<FocusHint>,

    sync: SyncScheduler,
    notifications: Vec<Notification>,

    holder: Rc<RefCell<ClipboardHolder>>,
    system_clipboard: Box<dyn SystemClipboard>,
    persistence: Option<Box<dyn PersistenceSink>>,
}

impl EditSession {
    pub fn new(document_id: impl Into<String>, blocks: Vec<Block>, config: EditorConfig) -> Result<Self, EditorError> {
        let page = Page::from_blocks(blocks)?;
        Ok(Self::from_page(document_id, page, config))
    }

    pub fn from_json(document_id: impl Into<String>, json: &str, config: EditorConfig) -> Result<Self, EditorError> {
        let page = Page::from_json(json)?;
        Ok(Self::from_page(document_id, page, config))
    }

    pub fn from_page(document_id: impl Into<String>, page: Page, config: EditorConfig) -> Self {
        let document_id = document_id.into();
        let document_url = config.document_url(&document_id);
        let focused = page.first_block().cloned();

        Self {
            document_id,
            document_url,
            history: History::new(page, &config.history),
            clock: LogicalClock::new(),
            selection: Selection::new(),
            slash_menu: None,
            focused,
            focus_hint: None,
            sync: SyncScheduler::new(config.sync_debounce_ms),
            notifications: Vec::new(),
            holder: Rc::new(RefCell::new(ClipboardHolder::new())),
            system_clipboard: Box::new(MemoryClipboard::new()),
            persistence: None,
            config,
        }
    }

    pub fn with_system_clipboard(mut self, clipboard: impl SystemClipboard + 'static) -> Self {
        self.system_clipboard = Box::new(clipboard);
        self
    }

    /// Share one holder between sessions for cross-document block paste
    pub fn with_clipboard_holder(mut self, holder: Rc<RefCell<ClipboardHolder>>) -> Self {
        self.holder = holder;
        self
    }

    pub fn with_persistence(mut self, sink: impl PersistenceSink + 'static) -> Self {
        self.persistence = Some(Box::new(sink));
        self
    }

    pub fn with_document_url(mut self, url: impl Into<String>) -> Self {
        self.document_url = url.into();
        self
    }

    // ----- read access -----

    pub fn page(&self) -> &Page {
        self.history.present()
    }

    /// Root list in nested form, as handed to rendering and persistence
    pub fn blocks(&self) -> Vec<Block> {
        self.page().to_blocks()
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn document_url(&self) -> &str {
        &self.document_url
    }

    pub fn set_document_url(&mut self, url: impl Into<String>) {
        self.document_url = url.into();
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn slash_menu(&self) -> Option<&SlashMenu> {
        self.slash_menu.as_ref()
    }

    pub fn focused(&self) -> Option<&BlockId> {
        self.focused.as_ref()
    }

    pub fn mode(&self) -> EditMode {
        if self.slash_menu.is_some() {
            EditMode::MenuOpen
        } else if self.selection.is_active() {
            EditMode::Navigating
        } else {
            EditMode::EditingText
        }
    }

    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    pub fn sync_pending(&self) -> bool {
        self.sync.is_pending()
    }

    /// Consume the pending caret placement
    pub fn take_focus_hint(&mut self) -> Option<FocusHint> {
        self.focus_hint.take()
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn link_to(&self, block: &BlockId) -> String {
        link::deep_link(&self.document_url, block)
    }

    // ----- mutations and history -----

    /// Apply one mutation as its own history step. Typing merges with the
    /// open typing step; everything else is immediate.
    pub fn apply(&mut self, mutation: Mutation) -> bool {
        self.commit_batch(&[mutation])
    }

    /// Apply mutations in order and commit the result once
    fn commit_batch(&mut self, mutations: &[Mutation]) -> bool {
        let mut page = self.page().clone();
        let mut changed = false;
        let mut focus = None;

        for mutation in mutations {
            let applied = mutation.apply(&page);
            if applied.changed {
                changed = true;
                page = applied.page;
            }
            if applied.focus.is_some() {
                focus = applied.focus;
            }
        }
        if !changed {
            return false;
        }

        let structural = mutations.iter().any(Mutation::is_structural);
        let label = mutations
            .iter()
            .rev()
            .find(|mutation| mutation.is_structural())
            .or_else(|| mutations.last())
            .map(Mutation::name)
            .unwrap_or("edit");

        let now = self.clock.now();
        if structural {
            self.history.commit(page, now, label);
        } else {
            self.history.commit_merged(page, now, label);
        }
        debug!(
            document = %self.document_id,
            op = label,
            structural,
            undo_levels = self.history.undo_levels(),
            "Committed edit"
        );

        self.selection.reconcile(self.history.present());
        if let Some(hint) = focus {
            self.focused = Some(hint.block.clone());
            self.focus_hint = Some(hint);
        }
        self.sync.schedule(now);
        true
    }

    pub fn undo(&mut self) -> bool {
        let label = self.history.undo_label();
        if self.history.undo().is_none() {
            return false;
        }
        debug!(document = %self.document_id, op = label.unwrap_or("edit"), "Undid edit");
        self.after_history_move();
        true
    }

    pub fn redo(&mut self) -> bool {
        let label = self.history.redo_label();
        if self.history.redo().is_none() {
            return false;
        }
        debug!(document = %self.document_id, op = label.unwrap_or("edit"), "Redid edit");
        self.after_history_move();
        true
    }

    fn after_history_move(&mut self) {
        let page = self.history.present();
        self.selection.reconcile(page);
        self.slash_menu = None;

        self.focus_hint = match self.focused.as_ref().filter(|id| page.contains(id)) {
            Some(id) => FocusHint::end_of(page, id),
            None => page.first_block().cloned().map(FocusHint::start),
        };
        self.focused = self.focus_hint.as_ref().map(|hint| hint.block.clone());
        self.sync.schedule(self.clock.now());
    }

    // ----- clock and persistence -----

    /// Advance the logical clock, syncing when the debounce has elapsed
    pub fn advance(&mut self, elapsed_ms: u64) {
        let now = self.clock.advance(elapsed_ms);
        if self.sync.take_due(now) {
            let _ = self.sync_now();
        }
    }

    /// Sync immediately if anything is pending
    pub fn flush(&mut self) {
        if self.sync.take_pending() {
            let _ = self.sync_now();
        }
    }

    /// Sync the current page now, reporting the sink's answer
    pub fn persist_now(&mut self) -> Result<(), EditorError> {
        if self.persistence.is_none() {
            return Err(EditorError::NoPersistence);
        }
        self.sync.cancel();
        self.sync_now().map_err(EditorError::from)
    }

    fn sync_now(&mut self) -> Result<(), SyncError> {
        let roots = self.history.present().to_blocks();
        let at = self.clock.now();
        let Some(sink) = self.persistence.as_mut() else {
            return Ok(());
        };

        match sink.persist(&self.document_id, &roots, at) {
            Ok(()) => {
                info!(document = %self.document_id, blocks = roots.len(), at, "Synced document");
                Ok(())
            }
            Err(err) => {
                warn!(document = %self.document_id, error = %err, "Sync failed, keeping local page");
                let notification = match &err {
                    SyncError::Conflict(_) => Notification::SyncConflict {
                        document_id: self.document_id.clone(),
                    },
                    SyncError::Backend(reason) => Notification::SyncFailed {
                        document_id: self.document_id.clone(),
                        reason: reason.clone(),
                    },
                };
                self.notifications.push(notification);
                Err(err)
            }
        }
    }

    /// Switch to another document: pending edits of the current one are
    /// synced first, then history starts over from the new page
    pub fn open(&mut self, document_id: impl Into<String>, blocks: Vec<Block>) -> Result<(), EditorError> {
        let page = Page::from_blocks(blocks)?;
        self.flush();

        let document_id = document_id.into();
        info!(document = %document_id, blocks = page.len(), "Opened document");

        self.document_url = self.config.document_url(&document_id);
        self.document_id = document_id;
        self.focused = page.first_block().cloned();
        self.focus_hint = self.focused.clone().map(FocusHint::start);
        self.history.reset(page, self.clock.now());
        self.selection.clear();
        self.slash_menu = None;
        self.sync.cancel();
        Ok(())
    }

    /// Teardown: pending syncs are dropped, not flushed
    pub fn close(&mut self) {
        if self.sync.is_pending() {
            debug!(document = %self.document_id, "Cancelled pending sync");
        }
        self.sync.cancel();
        self.selection.clear();
        self.slash_menu = None;
        self.focus_hint = None;
        info!(document = %self.document_id, "Closed document");
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    // ----- events -----

    pub fn handle(&mut self, event: InputEvent) -> EventOutcome {
        match event {
            InputEvent::Focus { block } => {
                if !self.page().contains(&block) {
                    return EventOutcome::IGNORED;
                }
                self.plain_action(&block);
                self.focused = Some(block);
                EventOutcome::handled(false)
            }

            InputEvent::ContentChanged {
                block,
                content,
                cursor,
            } => self.on_content_changed(block, content, cursor),

            InputEvent::Key {
                block,
                key,
                modifiers,
                cursor,
            } => self.on_key(block, key, modifiers, cursor),

            InputEvent::Click { block, modifiers } => {
                if !self.page().contains(&block) {
                    return EventOutcome::IGNORED;
                }
                self.slash_menu = None;
                if modifiers.shift {
                    self.selection.extend_to(self.history.present(), &block);
                } else {
                    self.selection.anchor_at(block.clone());
                    self.focused = Some(block);
                }
                EventOutcome::handled(false)
            }

            InputEvent::Run { command } => self.run(command),
        }
    }

    pub fn run(&mut self, command: Command) -> EventOutcome {
        let changed = match command {
            Command::Duplicate { block } => self.apply(Mutation::Duplicate { id: block }),
            Command::Delete { block } => self.apply(Mutation::Delete { id: block }),
            Command::Move { block, direction } => self.apply(Mutation::Move { id: block, direction }),
            Command::ChangeType { block, kind } => {
                self.slash_menu = None;
                self.apply(Mutation::ChangeType { id: block, kind })
            }
            Command::ToggleChecked { block } => {
                let checked = self.page().get(&block).map(|node| node.checked);
                match checked {
                    Some(checked) => self.apply(Mutation::SetChecked {
                        id: block,
                        checked: !checked,
                    }),
                    None => false,
                }
            }
            Command::ToggleOpen { block } => {
                let open = self.page().get(&block).map(|node| node.toggle_open);
                match open {
                    Some(open) => self.apply(Mutation::SetToggleOpen { id: block, open: !open }),
                    None => false,
                }
            }
            Command::SetPayload { block, payload } => self.apply(Mutation::SetPayload { id: block, payload }),
            Command::InsertAfter { after, kind } => self.apply(Mutation::InsertAfter {
                after,
                kind,
                content: String::new(),
            }),
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::Copy => {
                self.copy();
                false
            }
            Command::Cut => self.cut(),
            Command::Paste => self.paste(),
            Command::SelectAll => {
                self.select_all();
                false
            }
            Command::DeleteSelection => self.delete_selection(),
            Command::ClearSelection => {
                self.selection.clear();
                false
            }
            Command::SelectSlashEntry { index } => {
                let entry = self.slash_menu.as_ref().and_then(|menu| menu.entry(index));
                match entry {
                    Some(entry) => self.apply_slash_entry(entry),
                    None => false,
                }
            }
        };
        EventOutcome::handled(changed)
    }

    /// A plain (unmodified) action on a block drops any block selection
    fn plain_action(&mut self, block: &BlockId) {
        self.selection.anchor_at(block.clone());
        if self.slash_menu.as_ref().is_some_and(|menu| menu.block() != block) {
            self.slash_menu = None;
        }
    }

    fn on_content_changed(&mut self, block: BlockId, content: String, cursor: usize) -> EventOutcome {
        let (kind, previous) = match self.page().get(&block) {
            Some(node) if node.kind.has_text() => (node.kind, node.content.clone()),
            _ => return EventOutcome::IGNORED,
        };
        self.plain_action(&block);
        self.focused = Some(block.clone());

        let changed = self.apply(Mutation::UpdateContent {
            id: block.clone(),
            content: content.clone(),
        });

        if kind == BlockKind::Text {
            if let Some(shortcut) = autoformat::detect(&content) {
                return EventOutcome::handled(self.apply_shortcut(block, shortcut));
            }
        }

        if let Some(menu) = self.slash_menu.as_mut() {
            if !menu.track(&content, cursor) {
                debug!(block = %block, "Slash menu closed");
                self.slash_menu = None;
            }
        } else if kind != BlockKind::Code {
            if let Some(slash_at) = slash_menu::opens_at(&previous, &content, cursor) {
                debug!(block = %block, slash_at, "Slash menu opened");
                self.slash_menu = Some(SlashMenu::open(block, slash_at));
            }
        }

        EventOutcome {
            handled: false,
            changed,
        }
    }

    fn apply_shortcut(&mut self, block: BlockId, shortcut: autoformat::Shortcut) -> bool {
        self.slash_menu = None;
        let mut batch = vec![
            Mutation::UpdateContent {
                id: block.clone(),
                content: String::new(),
            },
            Mutation::ChangeType {
                id: block.clone(),
                kind: shortcut.kind,
            },
        ];
        if shortcut.checked {
            batch.push(Mutation::SetChecked {
                id: block.clone(),
                checked: true,
            });
        }

        let changed = self.commit_batch(&batch);
        self.focus_hint = Some(FocusHint::start(block));
        changed
    }

    fn apply_slash_entry(&mut self, entry: &SlashCommand) -> bool {
        let Some(menu) = self.slash_menu.take() else {
            return false;
        };
        let block = menu.block().clone();
        let Some(content) = self.page().get(&block).map(|node| node.content.clone()) else {
            return false;
        };

        let (stripped, caret) = menu.strip(&content);
        let changed = self.commit_batch(&[
            Mutation::UpdateContent {
                id: block.clone(),
                content: stripped,
            },
            Mutation::ChangeType {
                id: block.clone(),
                kind: entry.kind,
            },
        ]);

        let len = self.page().get(&block).map(|node| node.char_len()).unwrap_or(0);
        self.focus_hint = Some(FocusHint {
            block,
            offset: caret.min(len),
        });
        changed
    }

    fn on_key(&mut self, block: BlockId, key: Key, modifiers: Modifiers, cursor: TextCursor) -> EventOutcome {
        if let Some(outcome) = self.on_menu_key(&block, key, modifiers) {
            return outcome;
        }

        if self.selection.is_active() {
            match key {
                Key::Backspace | Key::Delete => return EventOutcome::handled(self.delete_selection()),
                Key::Escape => {
                    self.selection.clear();
                    return EventOutcome::handled(false);
                }
                _ => {}
            }
        }

        if let Some(action) = keymap::resolve(key, modifiers) {
            return self.on_shortcut(action, block, cursor);
        }

        if !self.page().contains(&block) {
            return EventOutcome::IGNORED;
        }
        if self.selection.is_active() {
            // Editing keys end block selection before touching text
            self.selection.anchor_at(block.clone());
        }
        self.focused = Some(block.clone());

        match key {
            Key::Enter => self.on_enter(block, modifiers.shift, cursor),
            Key::Backspace if cursor.is_collapsed() && cursor.start == 0 => self.on_backspace_at_start(block),
            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight => self.on_arrow(block, key, cursor),
            _ => EventOutcome::IGNORED,
        }
    }

    /// Keys consumed by an open slash menu
    fn on_menu_key(&mut self, block: &BlockId, key: Key, modifiers: Modifiers) -> Option<EventOutcome> {
        let menu = self.slash_menu.as_mut().filter(|menu| menu.block() == block)?;

        match key {
            Key::Escape => {
                self.slash_menu = None;
                Some(EventOutcome::handled(false))
            }
            Key::ArrowUp => {
                menu.cycle(false);
                Some(EventOutcome::handled(false))
            }
            Key::ArrowDown => {
                menu.cycle(true);
                Some(EventOutcome::handled(false))
            }
            Key::Tab => {
                menu.cycle(!modifiers.shift);
                Some(EventOutcome::handled(false))
            }
            Key::Enter => {
                let changed = match menu.highlighted() {
                    Some(entry) => self.apply_slash_entry(entry),
                    None => {
                        self.slash_menu = None;
                        false
                    }
                };
                Some(EventOutcome::handled(changed))
            }
            // The `/` itself is deleted natively
            Key::Backspace if menu.query().is_empty() => {
                self.slash_menu = None;
                Some(EventOutcome::IGNORED)
            }
            _ => None,
        }
    }

    fn on_shortcut(&mut self, action: KeyAction, block: BlockId, cursor: TextCursor) -> EventOutcome {
        match action {
            KeyAction::Duplicate => EventOutcome::handled(self.apply(Mutation::Duplicate { id: block })),
            KeyAction::DeleteBlock => EventOutcome::handled(self.apply(Mutation::Delete { id: block })),
            KeyAction::Move(direction) => EventOutcome::handled(self.apply(Mutation::Move { id: block, direction })),
            KeyAction::Undo => EventOutcome::handled(self.undo()),
            KeyAction::Redo => EventOutcome::handled(self.redo()),
            KeyAction::Copy | KeyAction::Cut if !self.selection.is_active() => EventOutcome::IGNORED,
            KeyAction::Copy => {
                self.copy();
                EventOutcome::handled(false)
            }
            KeyAction::Cut => EventOutcome::handled(self.cut()),
            KeyAction::Paste => self.paste_shortcut(),
            KeyAction::SelectAll => {
                let covered = self
                    .page()
                    .get(&block)
                    .is_some_and(|node| cursor.covers(node.char_len()));
                if !self.selection.is_active() && !covered {
                    return EventOutcome::IGNORED;
                }
                self.select_all();
                EventOutcome::handled(false)
            }
        }
    }

    fn on_enter(&mut self, block: BlockId, shift: bool, cursor: TextCursor) -> EventOutcome {
        let page = self.history.present();
        let Some(node) = page.get(&block) else {
            return EventOutcome::IGNORED;
        };
        let kind = node.kind;
        let content = node.content.clone();

        if shift && !kind.is_multiline() {
            return EventOutcome::IGNORED;
        }

        // An empty last child of a container steps out of it
        let container = node.parent.clone().filter(|parent| {
            kind == BlockKind::Text
                && content.is_empty()
                && page.children_of(Some(parent)).and_then(<[BlockId]>::last) == Some(&block)
        });

        let len = text::char_len(&content);
        let start = cursor.start.min(len);
        let end = cursor.end.clamp(start, len);
        let remaining = text::remove_chars(&content, start, end - start);

        let mutations = if kind.is_multiline() {
            if shift {
                vec![Mutation::InsertAfter {
                    after: Some(block),
                    kind: BlockKind::Text,
                    content: String::new(),
                }]
            } else {
                let changed = self.apply(Mutation::UpdateContent {
                    id: block.clone(),
                    content: text::insert_at_char(&remaining, start, "\n"),
                });
                self.focus_hint = Some(FocusHint {
                    block,
                    offset: start + 1,
                });
                return EventOutcome::handled(changed);
            }
        } else if let Some(container) = container {
            vec![Mutation::PromoteToSibling {
                container,
                child: block,
            }]
        } else if kind.is_list() && content.is_empty() {
            vec![Mutation::ChangeType {
                id: block,
                kind: BlockKind::Text,
            }]
        } else if kind.is_container() {
            vec![Mutation::InsertChild {
                container: block,
                after_index: None,
                kind: BlockKind::Text,
                content: String::new(),
            }]
        } else if !kind.has_text() {
            vec![Mutation::InsertAfter {
                after: Some(block),
                kind: BlockKind::Text,
                content: String::new(),
            }]
        } else {
            let mut batch = Vec::with_capacity(2);
            if start != end {
                batch.push(Mutation::UpdateContent {
                    id: block.clone(),
                    content: remaining,
                });
            }
            batch.push(Mutation::Split {
                id: block,
                offset: start,
            });
            batch
        };

        EventOutcome::handled(self.commit_batch(&mutations))
    }

    fn on_backspace_at_start(&mut self, block: BlockId) -> EventOutcome {
        let page = self.history.present();
        let Some(node) = page.get(&block) else {
            return EventOutcome::IGNORED;
        };

        let mutation = if node.kind.is_list() {
            Mutation::ChangeType {
                id: block,
                kind: BlockKind::Text,
            }
        } else if !node.kind.has_text() || node.is_empty() {
            // Keep the last block so there is somewhere to type
            if page.len() == 1 {
                return EventOutcome::handled(false);
            }
            Mutation::Delete { id: block }
        } else {
            Mutation::MergeUp { id: block }
        };

        EventOutcome::handled(self.apply(mutation))
    }

    fn on_arrow(&mut self, block: BlockId, key: Key, cursor: TextCursor) -> EventOutcome {
        let page = self.history.present();
        let Some(node) = page.get(&block) else {
            return EventOutcome::IGNORED;
        };

        let len = node.char_len();
        let first_line = !node.content.chars().take(cursor.start).any(|c| c == '\n');
        let last_line = !node.content.chars().skip(cursor.end).any(|c| c == '\n');
        let collapsed = cursor.is_collapsed();

        let backward = match key {
            Key::ArrowUp if first_line => true,
            Key::ArrowLeft if collapsed && cursor.start == 0 => true,
            Key::ArrowDown if last_line => false,
            Key::ArrowRight if collapsed && cursor.end >= len => false,
            _ => return EventOutcome::IGNORED,
        };

        let order = page.visible_order();
        let Some(index) = order.iter().position(|id| *id == block) else {
            return EventOutcome::IGNORED;
        };
        let target = if backward {
            index.checked_sub(1).and_then(|i| order.get(i))
        } else {
            order.get(index + 1)
        };
        let Some(target) = target.cloned() else {
            return EventOutcome::IGNORED;
        };

        self.focus_hint = if backward {
            FocusHint::end_of(page, &target)
        } else {
            Some(FocusHint::start(target.clone()))
        };
        self.focused = Some(target);
        EventOutcome::handled(false)
    }

    // ----- selection and clipboard -----

    pub fn select_all(&mut self) {
        self.slash_menu = None;
        self.selection.select_all(self.history.present());
    }

    /// Blocks a copy or cut acts on: the top-most selected blocks, or the
    /// focused block when nothing is selected
    fn clipboard_targets(&self) -> Vec<BlockId> {
        if self.selection.is_active() {
            return self.selection.top_level(self.page());
        }
        self.focused
            .iter()
            .filter(|id| self.page().contains(id))
            .cloned()
            .collect()
    }

    /// Copy into the holder and onto the system clipboard
    pub fn copy(&mut self) -> bool {
        let targets = self.clipboard_targets();
        let blocks: Vec<Block> = targets.iter().filter_map(|id| self.page().subtree(id)).collect();
        if blocks.is_empty() {
            return false;
        }

        self.holder.borrow_mut().store(blocks.clone());
        match clipboard::write_blocks(self.system_clipboard.as_mut(), &blocks) {
            Ok(outcome) => debug!(blocks = blocks.len(), ?outcome, "Copied blocks"),
            Err(err) => {
                warn!(error = %err, "System clipboard write failed, copy kept in session");
                self.notify(Notification::ClipboardUnavailable);
            }
        }
        true
    }

    /// Copy, then remove every copied block with its subtree
    pub fn cut(&mut self) -> bool {
        let targets = self.clipboard_targets();
        if !self.copy() {
            return false;
        }
        let changed = self.apply(Mutation::RemoveBlocks { ids: targets });
        self.selection.clear();
        changed
    }

    /// Flat removal of the selection; children of removed containers go too
    pub fn delete_selection(&mut self) -> bool {
        if !self.selection.is_active() {
            return false;
        }
        let ids = self.selection.top_level(self.page());
        let changed = self.apply(Mutation::RemoveBlocks { ids });
        self.selection.clear();
        changed
    }

    /// Paste replacing the selection, else after the focused block, else
    /// at the end of the page
    pub fn paste(&mut self) -> bool {
        let source = clipboard::blocks_for_paste(&self.holder.borrow(), self.system_clipboard.as_mut());
        let (blocks, source) = match source {
            Ok(found) => found,
            Err(ClipboardError::Empty) => {
                self.notify(Notification::NothingToPaste);
                return false;
            }
            Err(err) => {
                warn!(error = %err, "Nothing readable on the clipboard");
                self.notify(Notification::ClipboardUnavailable);
                return false;
            }
        };
        debug!(blocks = blocks.len(), ?source, "Pasting blocks");

        let page = self.history.present();
        let mut batch = Vec::with_capacity(2);
        let (parent, index) = if self.selection.is_active() {
            let Some(position) = self.selection.earliest_position(page) else {
                return false;
            };
            batch.push(Mutation::RemoveBlocks {
                ids: self.selection.top_level(page),
            });
            position
        } else {
            match self.focused.as_ref().and_then(|id| page.position(id)) {
                Some((parent, index)) => (parent, index + 1),
                None => (None, page.roots().len()),
            }
        };
        batch.push(Mutation::InsertBlocks { parent, index, blocks });

        let changed = self.commit_batch(&batch);
        self.selection.clear();
        changed
    }

    /// Mod+V: single-line plain text with no blocks to offer is left to
    /// native text paste
    fn paste_shortcut(&mut self) -> EventOutcome {
        if !self.selection.is_active() && self.holder.borrow().is_empty() {
            match self.system_clipboard.read_text() {
                Ok(text) if !text.contains('\n') && !clipboard::is_structured(&text) => {
                    return EventOutcome::IGNORED;
                }
                Err(_) => return EventOutcome::IGNORED,
                Ok(_) => {}
            }
        }
        EventOutcome::handled(self.paste())
    }
}
