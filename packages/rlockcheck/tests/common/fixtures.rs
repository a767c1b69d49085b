//! Go fixtures
//!
//! Each fixture is a complete single-file package.

/// Helper re-acquires the lock its caller holds
pub const HELPER_REACQUIRES: &str = r#"package store

import "sync"

type Store struct {
	mu   sync.RWMutex
	data map[string]int
}

func (s *Store) Get(key string) int {
	s.mu.RLock()
	defer s.mu.RUnlock()
	return s.data[key]
}

func (s *Store) Sum(keys []string) int {
	s.mu.RLock()
	total := 0
	for _, k := range keys {
		total += s.Get(k)
	}
	s.mu.RUnlock()
	return total
}
"#;

/// Acquire, release, acquire, release
pub const SEQUENTIAL: &str = r#"package store

import "sync"

type Store struct {
	mu sync.RWMutex
	n  int
}

func (s *Store) Twice() int {
	s.mu.RLock()
	a := s.n
	s.mu.RUnlock()
	s.mu.RLock()
	b := s.n
	s.mu.RUnlock()
	return a + b
}
"#;

/// Deferred release, nothing acquired before the return
pub const DEFER_THEN_RETURN: &str = r#"package store

import "sync"

type Store struct {
	mu sync.RWMutex
	n  int
}

func (s *Store) Get() int {
	s.mu.RLock()
	defer s.mu.RUnlock()
	return s.n
}

func (s *Store) Doubled() int {
	s.mu.RLock()
	defer s.mu.RUnlock()
	return s.n * 2
}
"#;

/// Deferred release, helper called before the return statement
pub const DEFER_THEN_CALL: &str = r#"package store

import "sync"

type Store struct {
	mu sync.RWMutex
	n  int
}

func (s *Store) Get() int {
	s.mu.RLock()
	defer s.mu.RUnlock()
	return s.n
}

func (s *Store) Doubled() int {
	s.mu.RLock()
	defer s.mu.RUnlock()
	v := s.Get()
	return v * 2
}
"#;

/// Two types with a `Size` method; only `Cache.Size` locks
pub const SAME_METHOD_NAME: &str = r#"package store

import "sync"

type Cache struct {
	mu sync.RWMutex
	n  int
}

func (c *Cache) Size() int {
	c.mu.RLock()
	defer c.mu.RUnlock()
	return c.n
}

type Plain struct {
	n int
}

func (p *Plain) Size() int {
	return p.n
}

func Report(c *Cache, p *Plain) int {
	c.mu.RLock()
	total := p.Size()
	total += c.Size()
	c.mu.RUnlock()
	return total
}
"#;

/// Two values of one type, each with its own lock
pub const TWO_INSTANCES: &str = r#"package store

import "sync"

type Counter struct {
	mu sync.RWMutex
	n  int
}

func (c *Counter) Get() int {
	c.mu.RLock()
	defer c.mu.RUnlock()
	return c.n
}

func Compare(a, b *Counter) int {
	a.mu.RLock()
	x := b.Get()
	a.mu.RUnlock()
	b.mu.RLock()
	y := a.Get()
	z := b.Get()
	b.mu.RUnlock()
	return x + y + z
}
"#;

/// Mutually recursive methods and functions, none re-acquiring
pub const MUTUAL_RECURSION: &str = r#"package tree

import "sync"

var registry sync.RWMutex

type Tree struct {
	mu   sync.RWMutex
	kids []*Tree
}

func (t *Tree) Walk() {
	t.mu.RLock()
	t.visit()
	t.mu.RUnlock()
}

func (t *Tree) visit() {
	t.other()
}

func (t *Tree) other() {
	t.visit()
}

func Lookup() {
	registry.RLock()
	ping(3)
	registry.RUnlock()
}

func ping(n int) {
	if n > 0 {
		pong(n - 1)
	}
}

func pong(n int) {
	ping(n)
}
"#;

/// Same lock acquired twice in one body
pub const DIRECT_TWICE: &str = r#"package store

import "sync"

type Store struct {
	mu sync.RWMutex
	n  int
}

func (s *Store) Broken() int {
	s.mu.RLock()
	s.mu.RLock()
	n := s.n
	s.mu.RUnlock()
	s.mu.RUnlock()
	return n
}
"#;

/// A closure bound to a variable re-acquires; the closure itself is clean
pub const CLOSURE_CALL: &str = r#"package store

import "sync"

type Store struct {
	mu sync.RWMutex
	n  int
}

func (s *Store) Each() int {
	s.mu.RLock()
	defer s.mu.RUnlock()
	read := func() int {
		s.mu.RLock()
		defer s.mu.RUnlock()
		return s.n
	}
	alias := read
	v := alias()
	return v
}
"#;

/// A deferred closure performs the release
pub const DEFERRED_CLOSURE_RELEASE: &str = r#"package store

import "sync"

type Store struct {
	mu sync.RWMutex
	n  int
}

func (s *Store) Get() int {
	s.mu.RLock()
	defer s.mu.RUnlock()
	return s.n
}

func (s *Store) Peek() int {
	s.mu.RLock()
	defer func() {
		s.mu.RUnlock()
	}()
	return s.Get()
}
"#;

/// Calls through an interface are never followed
pub const INTERFACE_CALL: &str = r#"package store

import "sync"

type Getter interface {
	Get() int
}

type Store struct {
	mu sync.RWMutex
	n  int
}

func (s *Store) Get() int {
	s.mu.RLock()
	defer s.mu.RUnlock()
	return s.n
}

func (s *Store) Via(g Getter) int {
	s.mu.RLock()
	n := g.Get()
	s.mu.RUnlock()
	return n
}
"#;

/// The lock travels into a free function as an argument
pub const ARGUMENT_CARRY: &str = r#"package store

import "sync"

type Counter struct {
	mu sync.RWMutex
	n  int
}

func read(c *Counter) int {
	c.mu.RLock()
	defer c.mu.RUnlock()
	return c.n
}

func Outer(c *Counter) int {
	c.mu.RLock()
	n := read(c)
	c.mu.RUnlock()
	return n
}
"#;

/// Exclusive lock acquired twice, for custom lock operation names
pub const EXCLUSIVE_TWICE: &str = r#"package store

import "sync"

type Store struct {
	mu sync.Mutex
	n  int
}

func (s *Store) Broken() int {
	s.mu.Lock()
	s.mu.Lock()
	n := s.n
	s.mu.Unlock()
	s.mu.Unlock()
	return n
}
"#;

/// User-defined lock type behind a package variable, reached through a call chain
pub const PACKAGE_LOCK_CHAIN: &str = r#"package main

import "fmt"

type Mutex struct {
	readers int
}

func (m *Mutex) RLock() {
	m.readers++
}

func (m *Mutex) RUnlock() {
	m.readers--
}

var mutex Mutex

func DoSomething() {
	mutex.RLock()
	DoSomethingElse()
	mutex.RUnlock()
}

func DoSomethingElse() {
	YetAnotherThing()
}

func YetAnotherThing() {
	mutex.RLock()
	fmt.Println("locked twice")
	mutex.RUnlock()
}

func main() {
	DoSomething()
}
"#;

/// Embedded lock; an unrelated type shares the method name
pub const EMBEDDED_LOCK: &str = r#"package main

import (
	"sync"

	iTypes "example.com/internal/types"
)

type ProtectResource struct {
	*sync.RWMutex
	resource string
}

func (p *ProtectResource) GetResource() string {
	p.RLock()
	defer p.RUnlock()
	return p.resource
}

type NotProtected struct {
	resource string
}

func (n *NotProtected) GetResource() string {
	return n.resource
}

func main() {
	resource := &ProtectResource{RWMutex: &sync.RWMutex{}, resource: "a"}
	other := &NotProtected{resource: "b"}
	var ext iTypes.Thing
	resource.RLock()
	_ = resource.GetResource()
	_ = other.GetResource()
	ext.Do()
	resource.RUnlock()
}
"#;

/// Deferred release fires at the early return only; the later call still holds the lock
pub const EARLY_RETURN: &str = r#"package store

import "sync"

type Store struct {
	mu sync.RWMutex
	n  int
}

func (s *Store) Get() int {
	s.mu.RLock()
	defer s.mu.RUnlock()
	return s.n
}

func (s *Store) Maybe(skip bool) int {
	s.mu.RLock()
	defer s.mu.RUnlock()
	if skip {
		return 0
	}
	v := s.Get()
	return v
}
"#;

/// Closure variable assigned a second literal before the locked call
pub const REASSIGNED_CLOSURE: &str = r#"package store

import "sync"

type Store struct {
	mu sync.RWMutex
	n  int
}

func (s *Store) Swap() int {
	f := func() {
		s.mu.RLock()
		s.mu.RUnlock()
	}
	f = func() {}
	s.mu.RLock()
	f()
	s.mu.RUnlock()
	return s.n
}
"#;

/// Two closures bound from one call result; neither is followed
pub const MISMATCHED_BINDING: &str = r#"package store

import "sync"

type Store struct {
	mu sync.RWMutex
}

func pair(s *Store) (func(), func()) {
	return func() {}, func() {
		s.mu.RLock()
		s.mu.RUnlock()
	}
}

func (s *Store) Both() {
	a, b := pair(s)
	s.mu.RLock()
	b()
	s.mu.RUnlock()
	a()
}
"#;
